use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// Authors separate pasted reports with ad-hoc runs of punctuation. Each
// pattern splits the output of the previous one, so mixed separators in a
// single blob still come apart.
static DELIMITER_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"={3,}").unwrap(),
        Regex::new(r"-{10,}").unwrap(),
        Regex::new(r"#{3,}").unwrap(),
        Regex::new(r"\*{3,}").unwrap(),
    ]
});
static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Words that distinguish a real report fragment from stray text between
/// separators. Matched case-insensitively.
const MARKER_WORDS: &[&str] = &["retorno", "dmc", "setor", "domicílio", "morador"];

const MIN_UNIT_LEN: usize = 20;
const MIN_PARAGRAPH_LEN: usize = 50;

/// Split a raw pasted blob into candidate report units, in source order.
/// Never returns an empty Vec for non-blank input: when nothing survives
/// the filters, the trimmed blob itself is the single unit.
pub fn segment(raw: &str) -> Vec<String> {
    let mut pieces: Vec<String> = vec![raw.to_string()];
    for re in DELIMITER_RES.iter() {
        pieces = pieces
            .iter()
            .flat_map(|piece| re.split(piece).map(str::to_string))
            .collect();
    }

    let valid: Vec<String> = pieces
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| piece.chars().count() >= MIN_UNIT_LEN)
        .filter(|piece| {
            let lower = piece.to_lowercase();
            MARKER_WORDS.iter().any(|word| lower.contains(word))
        })
        .map(str::to_string)
        .collect();

    // Reports separated only by blank lines produce a single delimiter-based
    // candidate; re-split the original blob on paragraph breaks instead.
    if valid.len() < 2 && raw.contains("\n\n") {
        let paragraphs: Vec<String> = PARAGRAPH_RE
            .split(raw)
            .map(str::trim)
            .filter(|p| p.chars().count() >= MIN_PARAGRAPH_LEN)
            .map(str::to_string)
            .collect();
        if paragraphs.len() > 1 {
            debug!(
                "paragraph fallback: {} unit(s) by delimiters, {} by blank lines",
                valid.len(),
                paragraphs.len()
            );
            return paragraphs;
        }
    }

    if valid.is_empty() {
        vec![raw.trim().to_string()]
    } else {
        valid
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_dashed_separator() {
        let raw = "=== RETORNO AO DMC ===\nSetor: 01\nDomicílio: 12\nMorador: José\n----------\n=== RETORNO AO DMC ===\nSetor: 02\nMorador: Ana\n";
        let units = segment(raw);
        assert_eq!(units.len(), 2);
        assert!(units[0].contains("Morador: José"));
        assert!(units[1].contains("Morador: Ana"));
    }

    #[test]
    fn cascade_handles_mixed_separators() {
        // === inside a region already delimited by ----------
        let raw = "Retorno setor um, morador Pedro\n----------\nRetorno setor dois, morador Rita\n===\nRetorno setor três, morador Caio";
        let units = segment(raw);
        assert_eq!(units.len(), 3);
        assert!(units[2].contains("Caio"));
    }

    #[test]
    fn short_pieces_are_noise() {
        let raw = "Retorno do setor cinco, morador ausente\n###\nsetor";
        let units = segment(raw);
        assert_eq!(units.len(), 1);
        assert!(units[0].contains("ausente"));
    }

    #[test]
    fn pieces_without_marker_words_are_dropped() {
        let raw = "Retorno do setor cinco, morador ausente\n***\nEste trecho longo não menciona nenhuma palavra-chave do relatório";
        let units = segment(raw);
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn paragraph_fallback_on_blank_lines() {
        let raw = "Primeiro relatório do retorno, com texto suficiente para o tamanho mínimo.\n\nSegundo relatório do retorno, também com texto suficiente para contar.";
        let units = segment(raw);
        assert_eq!(units.len(), 2);
        assert!(units[0].starts_with("Primeiro"));
        assert!(units[1].starts_with("Segundo"));
    }

    #[test]
    fn fallback_skipped_when_delimiters_yield_two_units() {
        // Blank line present, but the delimiter split already found 2 units;
        // the delimiter-based result stands.
        let raw = "Retorno setor um, morador Pedro presente\n===\nRetorno setor dois, morador Rita ausente\n\ncoda";
        let units = segment(raw);
        assert_eq!(units.len(), 2);
        assert!(units[1].contains("Rita"));
    }

    #[test]
    fn fallback_needs_more_than_one_long_paragraph() {
        let raw = "curto\n\nRelatório de retorno do setor três com morador identificado no local.";
        let units = segment(raw);
        // Only one paragraph passes the 50-char filter, so the delimiter
        // result (the single valid piece) stands.
        assert_eq!(units.len(), 1);
        assert!(units[0].contains("setor três"));
    }

    #[test]
    fn unrecognized_input_falls_back_to_whole_blob() {
        let units = segment("  nada aqui  ");
        assert_eq!(units, vec!["nada aqui".to_string()]);
    }

    #[test]
    fn non_blank_input_never_yields_empty() {
        for raw in ["x", "===", "----------\n***", "a\nb\nc"] {
            assert!(!segment(raw).is_empty(), "empty result for {:?}", raw);
        }
    }
}
