use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// ASCII base letters of an accented character: `é` becomes `e`. Combining
/// marks fold to nothing.
fn strip_accents(c: char) -> Option<String> {
    if is_combining_mark(c) {
        return Some(String::new());
    }
    let base: String = std::iter::once(c)
        .nfd()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    (!base.is_empty()).then_some(base)
}

/// Lower-case ASCII slug with Cyrillic transliterated and Latin accents
/// stripped. Runs of any other characters collapse into a single `-`. May
/// return an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let piece = if c.is_ascii_alphanumeric() {
            Some(c.to_string())
        } else {
            transliterate(c)
                .map(str::to_string)
                .or_else(|| strip_accents(c))
        };

        match piece {
            Some(p) if p.is_empty() => {}
            Some(p) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push_str(&p);
            }
            None => pending_dash = true,
        }
    }

    slug.truncate(90);
    slug.trim_end_matches('-').to_string()
}

/// Slug of `text`, or `<kind>-<short id>` when nothing usable remains.
pub fn slug_or_fallback(text: &str, kind: &str, id: Uuid) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        format!("{kind}-{}", short_id(id))
    } else {
        slug
    }
}

pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Appends `-1`, `-2`, … to `base` for the given attempt.
pub fn candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}
