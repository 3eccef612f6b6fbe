//! Built-in canonical categories.
//!
//! TACO group names and IBGE POF group names both map onto one list of
//! canonical codes. IBGE rows carry no group column, so their category is
//! derived from the first two digits of the food code.

use nutri_model::CategoryMap;

pub const FALLBACK_CATEGORY: &str = "diversos";

/// Canonical code and display label, in display order.
pub const CANONICAL_CATEGORIES: [(&str, &str); 15] = [
    ("cereais", "Cereais e derivados"),
    ("hortalicas", "Verduras, hortaliças e derivados"),
    ("frutas", "Frutas e derivados"),
    ("gorduras", "Gorduras e óleos"),
    ("pescados", "Pescados e frutos do mar"),
    ("carnes", "Carnes e derivados"),
    ("laticinios", "Leite e derivados"),
    ("bebidas", "Bebidas"),
    ("ovos", "Ovos e derivados"),
    ("acucares", "Produtos açucarados"),
    ("leguminosas", "Leguminosas e derivados"),
    ("nozes", "Nozes e sementes"),
    ("preparados", "Alimentos preparados"),
    ("industrializados", "Outros alimentos industrializados"),
    (FALLBACK_CATEGORY, "Miscelâneas"),
];

const TACO_GROUPS: [(&str, &str); 15] = [
    ("Cereais e derivados", "cereais"),
    ("Verduras, hortaliças e derivados", "hortalicas"),
    ("Frutas e derivados", "frutas"),
    ("Gorduras e óleos", "gorduras"),
    ("Pescados e frutos do mar", "pescados"),
    ("Carnes e derivados", "carnes"),
    ("Leite e derivados", "laticinios"),
    ("Bebidas (alcoólicas e não alcoólicas)", "bebidas"),
    ("Ovos e derivados", "ovos"),
    ("Produtos açucarados", "acucares"),
    ("Miscelâneas", FALLBACK_CATEGORY),
    ("Outros alimentos industrializados", "industrializados"),
    ("Alimentos preparados", "preparados"),
    ("Leguminosas e derivados", "leguminosas"),
    ("Nozes e sementes", "nozes"),
];

const IBGE_GROUPS: [(&str, &str); 12] = [
    ("Cereais e Produtos de Cereais", "cereais"),
    ("Hortaliças", "hortalicas"),
    ("Leguminosas", "leguminosas"),
    ("Óleos e Gorduras", "gorduras"),
    ("Frutas e Produtos de Frutas", "frutas"),
    ("Açúcares e Produtos de Confeitaria", "acucares"),
    ("Carnes e Produtos Cárneos", "carnes"),
    ("Peixes e Frutos do Mar", "pescados"),
    ("Leite e Produtos Lácteos", "laticinios"),
    ("Bebidas", "bebidas"),
    ("Diversos", FALLBACK_CATEGORY),
    ("Ovos e Derivados", "ovos"),
];

const IBGE_CODE_PREFIXES: [(&str, &str); 23] = [
    ("63", "cereais"),
    ("64", "hortalicas"),
    ("65", "leguminosas"),
    ("66", "gorduras"),
    ("67", "frutas"),
    ("68", "acucares"),
    ("69", "carnes"),
    ("70", "carnes"),
    ("71", "carnes"),
    ("72", "pescados"),
    ("73", "pescados"),
    ("74", "laticinios"),
    ("75", "laticinios"),
    ("76", "laticinios"),
    ("77", "laticinios"),
    ("78", "laticinios"),
    ("79", "laticinios"),
    ("80", "acucares"),
    ("81", "bebidas"),
    ("82", "bebidas"),
    ("83", "bebidas"),
    ("84", FALLBACK_CATEGORY),
    ("85", "ovos"),
];

/// The built-in category map covering both sources.
pub fn default_category_map() -> CategoryMap {
    let mut map = CategoryMap::new(FALLBACK_CATEGORY);
    for (code, label) in CANONICAL_CATEGORIES {
        map = map.with_label(code, label);
    }
    for (group, code) in TACO_GROUPS.into_iter().chain(IBGE_GROUPS) {
        map = map.with_entry(group, code);
    }
    for (prefix, code) in IBGE_CODE_PREFIXES {
        map = map.with_prefix(prefix, code);
    }
    map
}
