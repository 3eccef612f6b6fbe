use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Food-composition table a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceTag {
    /// Tabela Brasileira de Composição de Alimentos (NEPA/UNICAMP).
    #[serde(alias = "taco")]
    Taco,
    /// IBGE POF 2008-2009 nutritional composition tables.
    #[serde(alias = "ibge")]
    Ibge,
}

impl SourceTag {
    pub const ALL: [SourceTag; 2] = [SourceTag::Taco, SourceTag::Ibge];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Taco => "TACO",
            SourceTag::Ibge => "IBGE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SourceTag::Taco => "Tabela Brasileira de Composição de Alimentos (NEPA/UNICAMP)",
            SourceTag::Ibge => "IBGE POF 2008-2009 - Tabelas de Composição Nutricional",
        }
    }

    /// First identifier assigned to records of this source after a merge.
    pub fn default_id_offset(self) -> u32 {
        match self {
            SourceTag::Taco => 1,
            SourceTag::Ibge => 7000,
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceTag {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("taco") {
            Ok(SourceTag::Taco)
        } else if trimmed.eq_ignore_ascii_case("ibge") {
            Ok(SourceTag::Ibge)
        } else {
            Err(ModelError::UnknownSourceTag(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("taco".parse::<SourceTag>().unwrap(), SourceTag::Taco);
        assert_eq!(" IBGE ".parse::<SourceTag>().unwrap(), SourceTag::Ibge);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "USDA".parse::<SourceTag>().unwrap_err();
        assert_eq!(err, ModelError::UnknownSourceTag("USDA".to_string()));
    }

    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&SourceTag::Ibge).unwrap();
        assert_eq!(json, "\"IBGE\"");
    }
}
