//! Lexikon-Filter fuer generierten Text
//!
//! Zwei feste Tabellen: verbotene Woerter mit schlichter Alternative und
//! verbotene Phrasen, die ersetzt oder geloescht werden. Treffer gelten
//! nur als ganzes Wort, ohne Gross-/Kleinschreibung. Ein Bindestrich
//! direkt neben dem Treffer zaehlt als Teil des Wortes, `crucial-sounding`
//! trifft also nicht `crucial`.
//!
//! Nach der Ersetzung werden 3+ aufeinanderfolgende Zeilenumbrueche auf
//! genau 2 reduziert. Einfache und doppelte Umbrueche bleiben exakt erhalten.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Verbotene Woerter und ihre schlichte Alternative
pub const BANNED_WORDS: &[(&str, &str)] = &[
    ("delve", "dig"),
    ("tapestry", "mix"),
    ("testament", "proof"),
    ("crucial", "key"),
    ("pivotal", "key"),
    ("leverage", "use"),
    ("utilize", "use"),
    ("elevate", "raise"),
    ("seamless", "smooth"),
    ("seamlessly", "smoothly"),
    ("robust", "strong"),
    ("realm", "area"),
    ("foster", "build"),
    ("unlock", "open"),
    ("unleash", "release"),
    ("embark", "start"),
    ("synergy", "teamwork"),
    ("paradigm", "model"),
    ("game-changer", "big shift"),
    ("cutting-edge", "new"),
    ("groundbreaking", "new"),
    ("transformative", "big"),
    ("meticulous", "careful"),
    ("bustling", "busy"),
];

/// Verbotene Phrasen: Ersatz oder `None` fuer Loeschung
pub const BANNED_PHRASES: &[(&str, Option<&str>)] = &[
    ("let's dive in", None),
    ("without further ado", None),
    ("buckle up", None),
    ("in today's fast-paced world", None),
    ("it's important to note that", None),
    ("a testament to", Some("proof of")),
    ("dive deep", Some("look closely")),
    ("at the end of the day", Some("in the end")),
    ("in the ever-evolving", Some("in the changing")),
];

/// Ein kompilierter Lexikon-Eintrag
#[derive(Debug)]
struct Eintrag {
    begriff: &'static str,
    ersatz: Option<&'static str>,
    muster: Regex,
}

/// Kompiliertes Lexikon (Phrasen vor Woertern)
#[derive(Debug)]
pub struct Lexikon {
    phrasen: Vec<Eintrag>,
    woerter: Vec<Eintrag>,
}

static STANDARD: Lazy<Lexikon> = Lazy::new(Lexikon::standard_bauen);
static MEHRFACH_UMBRUCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n){3,}").expect("gueltiges Muster"));

impl Lexikon {
    /// Das feste Standard-Lexikon
    pub fn standard() -> &'static Lexikon {
        &STANDARD
    }

    /// Baut ein Lexikon aus eigenen Tabellen
    pub fn new(
        woerter: &[(&'static str, &'static str)],
        phrasen: &[(&'static str, Option<&'static str>)],
    ) -> Result<Self, regex::Error> {
        let woerter: Vec<Eintrag> = woerter
            .iter()
            .map(|&(begriff, ersatz)| eintrag(begriff, Some(ersatz)))
            .collect::<Result<_, _>>()?;
        let phrasen: Vec<Eintrag> = phrasen
            .iter()
            .map(|&(begriff, ersatz)| eintrag(begriff, ersatz))
            .collect::<Result<_, _>>()?;
        Ok(Self { phrasen, woerter })
    }

    fn standard_bauen() -> Self {
        // Die Tabellen sind statisch, escaped und in den Tests abgedeckt
        Self::new(BANNED_WORDS, BANNED_PHRASES).expect("Standard-Lexikon muss kompilieren")
    }

    /// Findet den fruehesten verbotenen Begriff im Text
    ///
    /// Gibt den Tabelleneintrag zurueck (kleingeschrieben), nicht die
    /// Schreibweise im Text.
    pub fn finde_verbotenes_wort(&self, text: &str) -> Option<&'static str> {
        self.woerter
            .iter()
            .chain(self.phrasen.iter())
            .filter_map(|e| erster_treffer(text, &e.muster).map(|pos| (pos, e.begriff)))
            .min_by_key(|&(pos, _)| pos)
            .map(|(_, begriff)| begriff)
    }

    /// Ersetzt alle verbotenen Begriffe, kuerzt Umbruch-Folgen und trimmt
    ///
    /// Leerraum wird nur an den Ersetzungsstellen angefasst, sonst bleibt
    /// der Text wie geschrieben. CRLF-Umbrueche bleiben CRLF.
    pub fn filtern(&self, text: &str) -> String {
        let mut ergebnis = text.to_string();
        for e in self.phrasen.iter().chain(self.woerter.iter()) {
            ergebnis = ersetzen(&ergebnis, e);
        }

        let ergebnis = MEHRFACH_UMBRUCH.replace_all(&ergebnis, |caps: &Captures| {
            if caps[0].contains('\r') {
                "\r\n\r\n"
            } else {
                "\n\n"
            }
        });
        ergebnis.trim().to_string()
    }
}

/// Filtert mit dem Standard-Lexikon
pub fn filter_text(text: &str) -> String {
    Lexikon::standard().filtern(text)
}

/// Sucht mit dem Standard-Lexikon
pub fn finde_verbotenes_wort(text: &str) -> Option<&'static str> {
    Lexikon::standard().finde_verbotenes_wort(text)
}

fn eintrag(begriff: &'static str, ersatz: Option<&'static str>) -> Result<Eintrag, regex::Error> {
    // Gerades und typografisches Apostroph gleich behandeln
    let kern = begriff
        .split('\'')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("['’]");
    Ok(Eintrag {
        begriff,
        ersatz,
        muster: Regex::new(&format!(r"(?i)\b{kern}\b"))?,
    })
}

fn ist_wortzeichen(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn ist_ganzwort(text: &str, start: usize, ende: usize) -> bool {
    let davor = text[..start].chars().next_back();
    let danach = text[ende..].chars().next();
    !davor.is_some_and(ist_wortzeichen) && !danach.is_some_and(ist_wortzeichen)
}

fn erster_treffer(text: &str, muster: &Regex) -> Option<usize> {
    muster
        .find_iter(text)
        .find(|m| ist_ganzwort(text, m.start(), m.end()))
        .map(|m| m.start())
}

fn ersetzen(text: &str, e: &Eintrag) -> String {
    let mut aus = String::with_capacity(text.len());
    let mut letzte = 0;
    let mut satzanfaenge = Vec::new();

    for m in e.muster.find_iter(text) {
        if m.start() < letzte || !ist_ganzwort(text, m.start(), m.end()) {
            continue;
        }
        aus.push_str(&text[letzte..m.start()]);
        letzte = match e.ersatz {
            Some(ersatz) => {
                aus.push_str(&schreibweise_uebernehmen(ersatz, m.as_str()));
                m.end()
            }
            None => {
                let ende = loeschrest_ende(text, m.end());
                // Vor Zeilenende oder Textende keine haengenden Leerzeichen
                if text[ende..].is_empty() || text[ende..].starts_with(['\n', '\r']) {
                    let behalten = aus.trim_end_matches([' ', '\t']).len();
                    aus.truncate(behalten);
                }
                if satzanfang(&aus) {
                    satzanfaenge.push(aus.len());
                }
                ende
            }
        };
    }

    aus.push_str(&text[letzte..]);
    for pos in satzanfaenge.into_iter().rev() {
        gross_an(&mut aus, pos);
    }
    aus
}

/// Ob an der aktuellen Ausgabeposition ein Satz beginnt
fn satzanfang(aus: &str) -> bool {
    let vorher = aus.trim_end_matches([' ', '\t']);
    vorher.is_empty() || vorher.ends_with(['.', '!', '?', '\n'])
}

/// Schreibt den Buchstaben an `pos` gross, falls dort ein Kleinbuchstabe steht
fn gross_an(text: &mut String, pos: usize) {
    let Some(c) = text.get(pos..).and_then(|rest| rest.chars().next()) else {
        return;
    };
    if c.is_lowercase() {
        let gross: String = c.to_uppercase().collect();
        text.replace_range(pos..pos + c.len_utf8(), &gross);
    }
}

/// Bei Loeschung: direkt folgende Interpunktion und Leerzeichen mitnehmen,
/// niemals Zeilenumbrueche
fn loeschrest_ende(text: &str, mut ende: usize) -> usize {
    if let Some(c) = text[ende..].chars().next() {
        if matches!(c, '.' | '!' | ',' | ':') {
            ende += c.len_utf8();
        }
    }
    ende + text[ende..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum::<usize>()
}

/// Uebertraegt Grossschreibung des Treffers auf den Ersatz
fn schreibweise_uebernehmen(ersatz: &str, treffer: &str) -> String {
    let buchstaben: Vec<char> = treffer.chars().filter(|c| c.is_alphabetic()).collect();
    if buchstaben.len() > 1 && buchstaben.iter().all(|c| c.is_uppercase()) {
        return ersatz.to_uppercase();
    }
    match (treffer.chars().next(), ersatz.chars().next()) {
        (Some(t), Some(erstes)) if t.is_uppercase() => {
            let mut aus: String = erstes.to_uppercase().collect();
            aus.push_str(&ersatz[erstes.len_utf8()..]);
            aus
        }
        _ => ersatz.to_string(),
    }
}
