/// Derive a URL-safe slug from a display name: lowercase, Latin accents
/// folded to ASCII, anything that is not alphanumeric collapsed into
/// single hyphens.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_dash = false;
    for ch in input.to_lowercase().chars() {
        let folded = fold_latin(ch);
        if folded.is_empty() {
            if !prev_dash && !out.is_empty() {
                out.push('-');
                prev_dash = true;
            }
            continue;
        }
        out.push_str(folded);
        prev_dash = false;
    }
    out.trim_matches('-').to_string()
}

/// Map one lowercase character to its ASCII slug form. Returns "" for
/// separators and punctuation.
fn fold_latin(ch: char) -> &'static str {
    match ch {
        'a'..='z' | '0'..='9' => ascii_str(ch),
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => "o",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'ç' => "c",
        'ñ' => "n",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'ø' => "o",
        _ => "",
    }
}

fn ascii_str(ch: char) -> &'static str {
    const TABLE: &[&str] = &[
        "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
        "s", "t", "u", "v", "w", "x", "y", "z",
    ];
    const DIGITS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    match ch {
        'a'..='z' => TABLE[(ch as usize) - ('a' as usize)],
        '0'..='9' => DIGITS[(ch as usize) - ('0' as usize)],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents() {
        assert_eq!(slugify("Rações"), "racoes");
    }

    #[test]
    fn collapses_punctuation_and_whitespace() {
        assert_eq!(slugify("Roupas & Acessórios"), "roupas-acessorios");
        assert_eq!(slugify("  Coleiras --  e Guias  "), "coleiras-e-guias");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Ração Premium 15kg"), "racao-premium-15kg");
    }

    #[test]
    fn already_clean_names_pass_through() {
        assert_eq!(slugify("brinquedos"), "brinquedos");
    }
}
