// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

// Mensagens de erro por idioma. Idioma ou chave desconhecidos caem no inglês.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const PT: &[(&str, &str)] = &[
    ("validation_error", "Um ou mais campos são inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("invalid_branch_header", "Cabeçalho x-branch-id inválido (deve ser numérico)."),
    ("enrollment_not_found", "Matrícula não encontrada."),
    ("upstream_unavailable", "Não foi possível consultar os dados de origem."),
];

const ES: &[(&str, &str)] = &[
    ("validation_error", "Uno o más campos no son válidos."),
    ("invalid_token", "Token de autenticación inválido o ausente."),
    ("invalid_branch_header", "Encabezado x-branch-id inválido (debe ser numérico)."),
    ("enrollment_not_found", "Matrícula no encontrada."),
    ("upstream_unavailable", "No fue posible consultar los datos de origen."),
];

const EN: &[(&str, &str)] = &[
    ("validation_error", "One or more fields are invalid."),
    ("invalid_token", "Invalid or missing authentication token."),
    ("invalid_branch_header", "Invalid x-branch-id header (must be numeric)."),
    ("enrollment_not_found", "Enrollment not found."),
    ("upstream_unavailable", "Could not reach the source data."),
];

impl I18nStore {
    pub fn new() -> Self {
        let messages = [("pt", PT), ("es", ES), ("en", EN)]
            .into_iter()
            .map(|(lang, table)| (lang, table.iter().copied().collect()))
            .collect();
        Self { messages }
    }

    pub fn message(&self, lang: &str, key: &str) -> String {
        let lookup = |lang: &str| self.messages.get(lang).and_then(|table| table.get(key));
        lookup(lang)
            .or_else(|| lookup(DEFAULT_LANG))
            .map(|m| m.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
