use serde::Serialize;
use std::fmt;

/// The twelve reporting months, declared in calendar order so the derived
/// `Ord` is the canonical Jan…Dec order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }

    /// Zero-based position in the calendar.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Case-insensitive lookup of a Spanish month name.
    pub fn from_name(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().to_lowercase() == wanted)
    }

    /// The first `n` months of the year (clamped to twelve).
    pub fn first(n: usize) -> &'static [Month] {
        &Month::ALL[..n.min(Month::ALL.len())]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month value as found in the source file.
///
/// Unrecognized values are kept verbatim so they still take part in
/// aggregation; they sort after every canonical month.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum MonthLabel {
    Known(Month),
    Other(String),
}

impl MonthLabel {
    pub fn parse(raw: &str) -> Self {
        match Month::from_name(raw) {
            Some(m) => MonthLabel::Known(m),
            None => MonthLabel::Other(raw.trim().to_string()),
        }
    }

    pub fn known(&self) -> Option<Month> {
        match self {
            MonthLabel::Known(m) => Some(*m),
            MonthLabel::Other(_) => None,
        }
    }

    /// True when this is a canonical month within the first `n` of the year.
    pub fn within_first(&self, n: usize) -> bool {
        self.known().is_some_and(|m| m.index() < n)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MonthLabel::Known(m) => m.as_str(),
            MonthLabel::Other(s) => s,
        }
    }
}

impl From<Month> for MonthLabel {
    fn from(m: Month) -> Self {
        MonthLabel::Known(m)
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_keeps_canonical_spelling() {
        assert_eq!(MonthLabel::parse("  enero "), MonthLabel::Known(Month::Enero));
        assert_eq!(MonthLabel::parse("SEPTIEMBRE").as_str(), "Septiembre");
    }

    #[test]
    fn unknown_months_sort_after_december() {
        let mut labels = vec![
            MonthLabel::parse("Setiembre"),
            MonthLabel::parse("Diciembre"),
            MonthLabel::parse("Enero"),
            MonthLabel::parse("Abril"),
        ];
        labels.sort();
        let names: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["Enero", "Abril", "Diciembre", "Setiembre"]);
    }

    #[test]
    fn first_months_window() {
        assert_eq!(Month::first(7).last(), Some(&Month::Julio));
        assert_eq!(Month::first(40).len(), 12);
        assert!(MonthLabel::parse("Julio").within_first(7));
        assert!(!MonthLabel::parse("Agosto").within_first(7));
        assert!(!MonthLabel::parse("???").within_first(12));
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&vec![
            MonthLabel::Known(Month::Marzo),
            MonthLabel::Other("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"["Marzo","x"]"#);
    }
}
