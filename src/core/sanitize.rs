// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Map a Latin letter with a diacritic to its base letter(s).
/// Covers the accents that show up in Italian/European team names.
fn fold_char(ch: char) -> Option<&'static str> {
    Some(match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => "A",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' => "E",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' => "I",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ō' => "O",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' => "U",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'š' | 'ś' => "s",
        'Š' | 'Ś' => "S",
        'ž' | 'ź' | 'ż' => "z",
        'Ž' | 'Ź' | 'Ż' => "Z",
        'ł' => "l",
        'Ł' => "L",
        'ß' => "ss",
        _ => return None,
    })
}

pub fn fold_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        // bare combining marks (already-decomposed input)
        if ('\u{0300}'..='\u{036f}').contains(&ch) { continue; }
        match fold_char(ch) {
            Some(base) => out.push_str(base),
            None => out.push(ch),
        }
    }
    out
}

/// `"Real Sàn Marco & Co."` → `"real-san-marco-and-co"`.
pub fn slugify(s: &str) -> String {
    let folded = fold_accents(s).to_lowercase().replace('&', "and");
    let mut out = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for ch in folded.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() { out.push('-'); }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Safe file stem: ASCII alphanumerics, `-` and `_`; whitespace runs become `_`.
pub fn sanitize_file_stem(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in fold_accents(name).chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_and_collapses() {
        assert_eq!(slugify("Real Sàn Marco & Co."), "real-san-marco-and-co");
        assert_eq!(slugify("  --Petriolese--  "), "petriolese");
        assert_eq!(slugify("A.S.D. Montecòsaro 1984"), "a-s-d-montecosaro-1984");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_drops_decomposed_marks() {
        // "e" + combining grave
        assert_eq!(slugify("Citta\u{0300} e\u{0301}"), "citta-e");
    }

    #[test]
    fn file_stem_falls_back_when_nothing_survives() {
        assert_eq!(sanitize_file_stem("Poster finale", "share"), "Poster_finale");
        assert_eq!(sanitize_file_stem("???", "share"), "share");
    }

    #[test]
    fn ws_is_collapsed() {
        assert_eq!(normalize_ws("  a \t b\n c "), "a b c");
    }
}
