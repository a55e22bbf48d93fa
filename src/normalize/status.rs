use std::sync::LazyLock;

use regex::Regex;

use crate::models::Status;

static IMPLANTACAO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)implanta[cç]ão").expect("static pattern compiles"));

/// Derive a [`Status`] from the free-text "Status Atual" cell.
///
/// Emoji markers win over words, checked in this order:
/// 🔴 Danger, 🟡 Care, ⏳ Aviso Prévio, ⚙ (or "implantação") Implementação.
/// Without a marker the whole cell must spell a status name (case-insensitive).
/// Anything else, including an empty cell, is `Safe`.
pub fn derive_status(raw: &str) -> Status {
    let text = raw.trim();

    if text.contains('🔴') {
        return Status::Danger;
    }
    if text.contains('🟡') {
        return Status::Care;
    }
    if text.contains('⏳') {
        return Status::NoticePending;
    }
    if text.contains('⚙') || IMPLANTACAO.is_match(text) {
        return Status::InImplementation;
    }

    match text.to_lowercase().as_str() {
        "safe" => Status::Safe,
        "care" => Status::Care,
        "danger" => Status::Danger,
        "aviso prévio" | "aviso previo" => Status::NoticePending,
        "implementação" | "implementacao" => Status::InImplementation,
        _ => Status::Safe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_marker_anywhere() {
        assert_eq!(derive_status("🔴"), Status::Danger);
        assert_eq!(derive_status("Cliente em risco 🔴 urgente"), Status::Danger);
        assert_eq!(derive_status("Safe 🔴"), Status::Danger);
    }

    #[test]
    fn test_marker_priority() {
        assert_eq!(derive_status("🟡 🔴"), Status::Danger);
        assert_eq!(derive_status("🟡 ⏳"), Status::Care);
        assert_eq!(derive_status("⏳ ⚙️"), Status::NoticePending);
        assert_eq!(derive_status("⚙️ Setup"), Status::InImplementation);
    }

    #[test]
    fn test_implantacao_text() {
        assert_eq!(derive_status("Em implantação"), Status::InImplementation);
        assert_eq!(derive_status("IMPLANTAcão"), Status::InImplementation);
        assert_eq!(derive_status("Implantacão"), Status::InImplementation);
    }

    #[test]
    fn test_literal_words_any_case() {
        assert_eq!(derive_status("Safe"), Status::Safe);
        assert_eq!(derive_status("sAfE"), Status::Safe);
        assert_eq!(derive_status(" care "), Status::Care);
        assert_eq!(derive_status("DANGER"), Status::Danger);
        assert_eq!(derive_status("Aviso Prévio"), Status::NoticePending);
        assert_eq!(derive_status("aviso previo"), Status::NoticePending);
        assert_eq!(derive_status("Implementação"), Status::InImplementation);
        assert_eq!(derive_status("implementacao"), Status::InImplementation);
    }

    #[test]
    fn test_unmatched_defaults_to_safe() {
        assert_eq!(derive_status(""), Status::Safe);
        assert_eq!(derive_status("   "), Status::Safe);
        assert_eq!(derive_status("Churned"), Status::Safe);
        assert_eq!(derive_status("danger zone"), Status::Safe);
    }
}
