//! Naive English inflection for default accessor names.
//!
//! Covers the shapes that show up in resource names (`note` -> `notes`,
//! `category` -> `categories`, `person` <-> `people`). Not a general
//! inflector; anything unusual should be spelled out via the `children`
//! option instead.

/// Irregular singular/plural pairs.
const IRREGULAR: &[(&str, &str)] = &[("person", "people"), ("child", "children")];

/// Pluralize a singular resource name.
pub fn pluralize(name: &str) -> String {
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == name) {
        return (*plural).to_string();
    }

    if let Some(stem) = name.strip_suffix('y') {
        if !stem.is_empty() && !ends_with_vowel(stem) {
            return format!("{stem}ies");
        }
    }

    if name.ends_with('s')
        || name.ends_with('x')
        || name.ends_with('z')
        || name.ends_with("ch")
        || name.ends_with("sh")
    {
        return format!("{name}es");
    }

    format!("{name}s")
}

/// Singularize a collection name.
pub fn singularize(name: &str) -> String {
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == name) {
        return (*singular).to_string();
    }

    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }

    if let Some(stem) = name.strip_suffix("es") {
        if stem.ends_with('s')
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh")
        {
            return stem.to_string();
        }
    }

    name.strip_suffix('s').unwrap_or(name).to_string()
}

fn ends_with_vowel(s: &str) -> bool {
    matches!(s.chars().last(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("note", "notes")]
    #[test_case("group", "groups")]
    #[test_case("person", "people")]
    #[test_case("category", "categories")]
    #[test_case("day", "days")]
    #[test_case("box", "boxes")]
    #[test_case("branch", "branches")]
    fn test_pluralize(singular: &str, plural: &str) {
        assert_eq!(pluralize(singular), plural);
    }

    #[test_case("notes", "note")]
    #[test_case("groups", "group")]
    #[test_case("people", "person")]
    #[test_case("categories", "category")]
    #[test_case("boxes", "box")]
    #[test_case("branches", "branch")]
    fn test_singularize(plural: &str, singular: &str) {
        assert_eq!(singularize(plural), singular);
    }

    #[test_case("note")]
    #[test_case("person")]
    #[test_case("category")]
    fn test_roundtrip(singular: &str) {
        assert_eq!(singularize(&pluralize(singular)), singular);
    }
}
