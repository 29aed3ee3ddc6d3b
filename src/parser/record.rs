use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-=*#]{5,}$").unwrap());
static ENTREVISTADOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^entrevistador:\s*").unwrap());
static EXPLICACAO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^explicação:\s*").unwrap());

/// Display title shared by every report under the current grammar.
pub const TITLE: &str = "RETORNO AO DMC";

/// Phrases that mark a line as the interview-copy note.
const COPY_NOTE_PHRASES: &[&str] = &["cópia da entrevista", "só avisar", "se quiser"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

/// Key/value pairs in first-insertion order. Keys are unique: inserting an
/// existing key overwrites its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldMap(Vec<Field>);

impl FieldMap {
    pub fn insert(&mut self, key: String, value: String) {
        if let Some(field) = self.0.iter_mut().find(|f| f.key == key) {
            field.value = value;
        } else {
            self.0.push(Field { key, value });
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|f| f.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One parsed report. Built once per unit and never mutated afterwards;
/// anything the grammar did not recognize is simply left empty.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub original_text: String,
    pub fields: FieldMap,
    pub explanation: String,
    pub copy_note: String,
    pub interviewer: String,
    pub title: &'static str,
}

#[derive(Debug, PartialEq)]
enum ExplanationState {
    Idle,
    Collecting,
}

/// Accumulates the free-text explanation block. A new "explicação:" marker
/// restarts the text; a structural separator stops collection without
/// discarding what was gathered.
#[derive(Debug)]
struct ExplanationMachine {
    state: ExplanationState,
    text: String,
}

impl ExplanationMachine {
    fn new() -> Self {
        Self {
            state: ExplanationState::Idle,
            text: String::new(),
        }
    }

    fn begin(&mut self, first: &str) {
        self.state = ExplanationState::Collecting;
        self.text = first.to_string();
    }

    fn interrupt(&mut self) {
        self.state = ExplanationState::Idle;
    }

    fn is_collecting(&self) -> bool {
        self.state == ExplanationState::Collecting
    }

    fn append(&mut self, line: &str) {
        self.text.push(' ');
        self.text.push_str(line);
    }

    fn finish(self) -> String {
        self.text.trim().to_string()
    }
}

/// Parse one report unit into a `Record`. Total over all input: malformed
/// content yields empty fields, never an error.
///
/// Each non-blank trimmed line is consumed by the first matching rule; the
/// separator check deliberately precedes the colon-field check.
pub fn parse(unit: &str) -> Record {
    let mut fields = FieldMap::default();
    let mut interviewer = String::new();
    let mut copy_note = String::new();
    let mut explanation = ExplanationMachine::new();

    for line in unit.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        // Title banner carries no data.
        if line.contains(TITLE) || (line.contains("===") && lower.contains("retorno")) {
            continue;
        }

        if SEPARATOR_RE.is_match(line) {
            explanation.interrupt();
            continue;
        }

        if let Some(m) = ENTREVISTADOR_RE.find(line) {
            interviewer = line[m.end()..].trim().to_string();
            continue;
        }

        if COPY_NOTE_PHRASES.iter().any(|p| lower.contains(p)) {
            copy_note = line.to_string();
            continue;
        }

        if let Some(m) = EXPLICACAO_RE.find(line) {
            explanation.begin(line[m.end()..].trim());
            continue;
        }

        if explanation.is_collecting() {
            explanation.append(line);
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value.trim();
            if !key.is_empty() && !value.is_empty() {
                fields.insert(key.to_lowercase(), value.to_string());
            }
        }
        // Anything else is noise and is dropped.
    }

    Record {
        original_text: unit.to_string(),
        fields,
        explanation: explanation.finish(),
        copy_note,
        interviewer,
        title: TITLE,
    }
}

// ── Tests ──
