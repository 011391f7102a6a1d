use serde::Deserialize;

pub const DISH_NAME_FALLBACK: &str = "Dish Name Not Generated Correctly";

const TITLE_MARKER: &str = "title:";
const END_MARKERS: [&str; 2] = ["recipe", "ingredients"];

/// How the dish name is pulled out of a generated recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DishNameStrategy {
    /// Ask the text backend for the name.
    #[default]
    Ask,
    /// Scan the text for a `Title:` line.
    TitleMarker,
}

/// Text after `title:` up to the next `recipe` or `ingredients`, case-insensitive.
pub fn from_title_marker(text: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let start = lower.find(TITLE_MARKER)? + TITLE_MARKER.len();

    let rest = &lower[start..];
    let end = END_MARKERS
        .iter()
        .filter_map(|m| rest.find(m))
        .min()
        .map_or(text.len(), |i| start + i);

    // A title may wrap across lines.
    let title = text[start..end].split_whitespace().collect::<Vec<_>>().join(" ");
    strip_decoration(&title)
}

/// First non-empty line of a model answer, without decoration.
pub fn clean(name: &str) -> Option<String> {
    let line = name.lines().map(str::trim).find(|l| !l.is_empty())?;
    strip_decoration(line)
}

/// Strips whitespace and markdown/quote decoration; `None` if nothing is left.
fn strip_decoration(name: &str) -> Option<String> {
    let name = name.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '*' | '#' | '"' | '\'' | '`' | ':' | '-')
    });
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_text_between_title_and_ingredients() {
        let text = "Title: Spinach and Feta Omelette\n\nIngredients:\n- 3 eggs";
        assert_eq!(
            from_title_marker(text).as_deref(),
            Some("Spinach and Feta Omelette")
        );
    }

    #[test]
    fn marker_match_is_case_insensitive_and_stops_at_recipe() {
        let text = "**TITLE:** Greek Frittata Recipe for two";
        assert_eq!(from_title_marker(text).as_deref(), Some("Greek Frittata"));
    }

    #[test]
    fn wrapped_title_is_joined_into_one_line() {
        let text = "Title: Spinach &\nFeta Omelette\nIngredients: eggs";
        assert_eq!(
            from_title_marker(text).as_deref(),
            Some("Spinach & Feta Omelette")
        );
    }

    #[test]
    fn missing_end_marker_runs_to_end_of_text() {
        assert_eq!(
            from_title_marker("title: Shakshuka").as_deref(),
            Some("Shakshuka")
        );
    }

    #[test]
    fn missing_or_empty_title_yields_none() {
        assert_eq!(from_title_marker(""), None);
        assert_eq!(from_title_marker("Just some eggs and spinach."), None);
        assert_eq!(from_title_marker("Title:\nIngredients: eggs"), None);
    }

    #[test]
    fn non_ascii_titles_survive() {
        assert_eq!(
            from_title_marker("Title: Сырники\nIngredients: творог").as_deref(),
            Some("Сырники")
        );
    }

    #[test]
    fn clean_strips_decoration() {
        assert_eq!(clean("  \"**Ratatouille**\"\n").as_deref(), Some("Ratatouille"));
        assert_eq!(clean("\n\n## Pad Thai\nextra").as_deref(), Some("Pad Thai"));
        assert_eq!(clean(" ** "), None);
    }
}
