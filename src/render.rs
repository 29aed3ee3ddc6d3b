use clap::ValueEnum;

use crate::parser::Record;

/// Color palette for the HTML output. Passed explicitly to `render_html`;
/// there is no persisted or global theme state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

struct FieldLabel {
    key: &'static str,
    label: &'static str,
    inline: bool,
}

/// Recognized fields, in display order. Everything else gets a synthesized
/// "📌 Key" label after these, in insertion order.
const FIELD_ORDER: &[FieldLabel] = &[
    FieldLabel { key: "setor", label: "🏢 Setor", inline: true },
    FieldLabel { key: "domicílio", label: "🏠 Domicílio", inline: true },
    FieldLabel { key: "morador", label: "👤 Morador", inline: true },
    FieldLabel { key: "profissão", label: "💼 Profissão", inline: true },
    FieldLabel { key: "o que arrumar", label: "🔧 O que arrumar", inline: false },
];

pub fn count_summary(count: usize) -> String {
    if count == 1 {
        "📄 1 retorno processado".to_string()
    } else {
        format!("📄 {} retornos processados", count)
    }
}

/// Render records as plain terminal text, ending with the count summary.
pub fn render_text(records: &[Record]) -> String {
    let mut out = String::new();
    for (i, rec) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&"-".repeat(40));
            out.push('\n');
        }
        let title = block_title(rec, i + 1, records.len());
        out.push_str(&title);
        out.push('\n');
        if !rec.interviewer.is_empty() {
            out.push_str(&format!("👨‍💼 Entrevistador: {}\n", rec.interviewer));
        }
        for (label, value, inline) in display_fields(rec) {
            if inline {
                out.push_str(&format!("  {}: {}\n", label, value));
            } else {
                out.push_str(&format!("  {}:\n    {}\n", label, value));
            }
        }
        if !rec.explanation.is_empty() {
            out.push_str("  💡 Explicação\n");
            out.push_str(&format!("    {}\n", clean_empty_quotes(&rec.explanation)));
        }
        if !rec.copy_note.is_empty() {
            out.push_str(&format!("  📋 {}\n", rec.copy_note));
        }
    }
    out.push('\n');
    out.push_str(&count_summary(records.len()));
    out.push('\n');
    out
}

/// Render records as a standalone HTML document with the given theme.
pub fn render_html(records: &[Record], theme: Theme) -> String {
    let mut s = String::new();
    s.push_str("<!DOCTYPE html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\"><title>Retorno ao DMC</title><style>");
    match theme {
        Theme::Dark => s.push_str(
            "body{margin:0;background:#0f1216;color:#e5e7eb;font-family:system-ui,-apple-system,Arial,sans-serif} .container{max-width:720px;margin:0 auto;padding:24px} .results-count{color:#9aa0a6;font-size:13px;margin-bottom:12px} .entrevistador{color:#9aa0a6;font-size:13px;margin:10px 0 4px} .report{background:#141820;border:1px solid #1f2430;border-radius:10px;padding:16px;margin-bottom:12px} .dmc-title{font-size:17px;font-weight:600;margin-bottom:10px} .info{padding:3px 0} .info .label{color:#9aa0a6;margin-right:6px} .info-block .value{display:block;margin-top:2px} .explanation{margin-top:10px;border-top:1px solid #1f2430;padding-top:8px} .explanation .head{color:#9aa0a6;font-size:13px;margin-bottom:4px} .copy-note{margin-top:8px;color:#9aa0a6;font-size:13px} .separator{height:1px;background:#1f2430;margin:16px 0}",
        ),
        Theme::Light => s.push_str(
            "body{margin:0;background:#f7fafc;color:#111827;font-family:system-ui,-apple-system,Arial,sans-serif} .container{max-width:720px;margin:0 auto;padding:24px} .results-count{color:#6b7280;font-size:13px;margin-bottom:12px} .entrevistador{color:#6b7280;font-size:13px;margin:10px 0 4px} .report{background:#ffffff;border:1px solid #e5e7eb;border-radius:10px;padding:16px;margin-bottom:12px} .dmc-title{font-size:17px;font-weight:600;margin-bottom:10px} .info{padding:3px 0} .info .label{color:#6b7280;margin-right:6px} .info-block .value{display:block;margin-top:2px} .explanation{margin-top:10px;border-top:1px solid #e5e7eb;padding-top:8px} .explanation .head{color:#6b7280;font-size:13px;margin-bottom:4px} .copy-note{margin-top:8px;color:#6b7280;font-size:13px} .separator{height:1px;background:#e5e7eb;margin:16px 0}",
        ),
    }
    s.push_str("</style></head><body><div class=\"container\">");
    s.push_str(&format!(
        "<div class=\"results-count\">{}</div>",
        count_summary(records.len())
    ));
    for (i, rec) in records.iter().enumerate() {
        if i > 0 {
            s.push_str("<div class=\"separator\"></div>");
        }
        push_html_block(&mut s, rec, i + 1, records.len());
    }
    s.push_str("</div></body></html>");
    s
}

fn push_html_block(s: &mut String, rec: &Record, number: usize, total: usize) {
    // The interviewer lives outside the main block so it is not part of the
    // shareable report frame.
    if !rec.interviewer.is_empty() {
        s.push_str(&format!(
            "<div class=\"entrevistador\">👨‍💼 Entrevistador: <span>{}</span></div>",
            escape_html(&rec.interviewer)
        ));
    }
    s.push_str("<div class=\"report\">");
    s.push_str(&format!(
        "<div class=\"dmc-title\">{}</div>",
        escape_html(&block_title(rec, number, total))
    ));
    for (label, value, inline) in display_fields(rec) {
        let class = if inline { "info info-inline" } else { "info info-block" };
        s.push_str(&format!(
            "<div class=\"{}\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
            class,
            label,
            escape_html(&value)
        ));
    }
    if !rec.explanation.is_empty() {
        s.push_str(&format!(
            "<div class=\"explanation\"><div class=\"head\">💡 Explicação</div><div>{}</div></div>",
            escape_html(&clean_empty_quotes(&rec.explanation))
        ));
    }
    if !rec.copy_note.is_empty() {
        s.push_str(&format!(
            "<div class=\"copy-note\">📋 {}</div>",
            escape_html(&rec.copy_note)
        ));
    }
    s.push_str("</div>");
}

fn block_title(rec: &Record, number: usize, total: usize) -> String {
    if total > 1 {
        format!("📋 {} #{}", rec.title, number)
    } else {
        format!("📋 {}", rec.title)
    }
}

/// Ordered (label, cleaned value, inline) triples: recognized fields first,
/// then the remaining ones in insertion order.
fn display_fields(rec: &Record) -> Vec<(String, String, bool)> {
    let mut out = Vec::with_capacity(rec.fields.len());
    for spec in FIELD_ORDER {
        if let Some(value) = rec.fields.get(spec.key) {
            out.push((spec.label.to_string(), clean_empty_quotes(value), spec.inline));
        }
    }
    for field in rec.fields.iter() {
        if !FIELD_ORDER.iter().any(|spec| spec.key == field.key) {
            out.push((
                format!("📌 {}", capitalize_first(&field.key)),
                clean_empty_quotes(&field.value),
                true,
            ));
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Source reports carry a `""` artifact where an empty quotation was pasted;
/// collapse it to a single quote for display only.
fn clean_empty_quotes(text: &str) -> String {
    text.replace("\"\"", "\"")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::parse;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn collapses_empty_quote_pairs() {
        assert_eq!(clean_empty_quotes(r#"disse ""nada"#), r#"disse "nada"#);
        assert_eq!(clean_empty_quotes("sem aspas"), "sem aspas");
    }

    #[test]
    fn cleaning_does_not_mutate_the_record() {
        let rec = parse(r#"Morador: citou ""aspas"#);
        let _ = render_text(&[rec.clone()]);
        let _ = render_html(&[rec.clone()], Theme::Dark);
        assert_eq!(rec.fields.get("morador"), Some(r#"citou ""aspas"#));
    }

    #[test]
    fn recognized_fields_render_before_unknown_ones() {
        // "obs" arrives first in the source, but setor is a recognized key.
        let rec = parse("Obs: cachorro bravo\nSetor: 09\nTelefone: 99");
        let labels: Vec<String> = display_fields(&rec).into_iter().map(|(l, ..)| l).collect();
        assert_eq!(labels, vec!["🏢 Setor", "📌 Obs", "📌 Telefone"]);
    }

    #[test]
    fn count_summary_singular_and_plural() {
        assert_eq!(count_summary(1), "📄 1 retorno processado");
        assert_eq!(count_summary(3), "📄 3 retornos processados");
    }

    #[test]
    fn text_output_numbers_blocks_when_several() {
        let records = vec![parse("Setor: 01"), parse("Setor: 02")];
        let out = render_text(&records);
        assert!(out.contains("📋 RETORNO AO DMC #1"));
        assert!(out.contains("📋 RETORNO AO DMC #2"));
        assert!(out.contains("📄 2 retornos processados"));
    }

    #[test]
    fn single_record_title_is_unnumbered() {
        let out = render_text(&[parse("Setor: 01")]);
        assert!(out.contains("📋 RETORNO AO DMC\n"));
        assert!(!out.contains("#1"));
    }

    #[test]
    fn html_escapes_values_and_honors_theme() {
        let rec = parse("Morador: <b>Maria</b>\nEntrevistador: A & B");
        let dark = render_html(std::slice::from_ref(&rec), Theme::Dark);
        assert!(dark.contains("&lt;b&gt;Maria&lt;/b&gt;"));
        assert!(dark.contains("A &amp; B"));
        assert!(dark.contains("background:#0f1216"));
        let light = render_html(&[rec], Theme::Light);
        assert!(light.contains("background:#f7fafc"));
    }

    #[test]
    fn explanation_and_copy_note_sections_render() {
        let rec = parse("Explicação: voltou a funcionar\n-----\nSó avisar se precisar");
        let out = render_text(&[rec]);
        assert!(out.contains("💡 Explicação"));
        assert!(out.contains("voltou a funcionar"));
        assert!(out.contains("📋 Só avisar se precisar"));
    }
}
