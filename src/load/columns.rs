use regex::Regex;

pub const TAX_TYPE: &str = "impuesto";
pub const YEAR: &str = "año";
pub const MONTH: &str = "mes";
pub const CUSTOMS_OFFICE: &str = "aduana";
pub const AMOUNT: &str = "recaudación";
pub const LATITUDE: &str = "latitud";
pub const LONGITUDE: &str = "longitud";

pub const REQUIRED: [&str; 7] = [
    TAX_TYPE,
    YEAR,
    MONTH,
    CUSTOMS_OFFICE,
    AMOUNT,
    LATITUDE,
    LONGITUDE,
];

/// Accent-free spellings seen in exported sheets.
const ALIASES: [(&str, &str); 3] = [("ano", YEAR), ("anio", YEAR), ("recaudacion", AMOUNT)];

/// Canonical form of every header: trimmed, BOM stripped, lowercase,
/// internal whitespace collapsed to `_`, known aliases resolved.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    let ws = Regex::new(r"\s+").expect("whitespace pattern should compile");
    headers
        .iter()
        .map(|raw| {
            let name = raw.trim().trim_start_matches('\u{feff}').trim().to_lowercase();
            let name = ws.replace_all(&name, "_").into_owned();
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, canonical)| canonical.to_string())
                .unwrap_or(name)
        })
        .collect()
}

/// Positions of the required columns inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub tax_type: usize,
    pub year: usize,
    pub month: usize,
    pub customs_office: usize,
    pub amount: usize,
    pub latitude: usize,
    pub longitude: usize,
}

impl ColumnIndex {
    /// Locate every required column among already-normalized headers.
    /// On failure returns the full list of missing canonical names.
    pub fn resolve(normalized: &[String]) -> Result<Self, Vec<String>> {
        let find = |name: &str| normalized.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            tax_type: at(TAX_TYPE),
            year: at(YEAR),
            month: at(MONTH),
            customs_office: at(CUSTOMS_OFFICE),
            amount: at(AMOUNT),
            latitude: at(LATITUDE),
            longitude: at(LONGITUDE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_are_lowercased_and_aliased() {
        let got = normalize_headers(&strings(&[
            "\u{feff}Impuesto",
            " AÑO ",
            "Recaudacion",
            "Tipo  de cambio",
        ]));
        assert_eq!(got, strings(&["impuesto", "año", "recaudación", "tipo_de_cambio"]));
    }

    #[test]
    fn resolve_reports_every_missing_column() {
        let headers = normalize_headers(&strings(&["Impuesto", "Año", "Mes", "Aduana"]));
        let missing = ColumnIndex::resolve(&headers).unwrap_err();
        assert_eq!(missing, strings(&["recaudación", "latitud", "longitud"]));
    }

    #[test]
    fn resolve_finds_columns_in_any_order() {
        let headers = normalize_headers(&strings(&[
            "Longitud", "Latitud", "Recaudación", "Aduana", "Mes", "Año", "Impuesto", "Extra",
        ]));
        let idx = ColumnIndex::resolve(&headers).unwrap();
        assert_eq!(idx.longitude, 0);
        assert_eq!(idx.tax_type, 6);
    }
}
