use crate::app::Action;

const FAV_USAGE: &str =
    "Usage: `fav list` · `fav add <name> | <recipe>` · `fav update <id> <name> | <recipe>` · `fav delete <id>`";
const FRIDGE_USAGE: &str = "Usage: `fridge list` · `fridge add <name> <qty>` · `fridge update <id> <name> <qty>` · `fridge delete <id>`";

/// Turns the text of a message addressed to the bot into an [`Action`].
/// The error is a usage hint for the user.
pub(super) fn parse(content: &str) -> Result<Action, String> {
    let (command, rest) = split_word(content);

    match command.to_lowercase().as_str() {
        "" | "help" => Ok(Action::Help),
        "fav" | "favs" | "favorites" => parse_favorites(rest),
        "fridge" => parse_fridge(rest),
        "generate" => Ok(Action::Generate {
            ingredients: rest.to_string(),
        }),
        "save" => Ok(Action::SaveGenerated),
        "chat" => Ok(match rest.to_lowercase().as_str() {
            "start" => Action::StartChat,
            "" | "history" => Action::ShowChat,
            _ => Action::Ask {
                question: rest.to_string(),
            },
        }),
        "plan" if rest.is_empty() => Ok(Action::ShowPlan),
        "plan" => {
            let mut parts = rest.splitn(3, '|').map(str::trim);
            Ok(Action::PlanMeals {
                preferences: parts.next().unwrap_or_default().to_string(),
                allergies: parts.next().unwrap_or_default().to_string(),
                ingredients: parts.next().unwrap_or_default().to_string(),
            })
        }
        "recommend" => Ok(Action::Recommend {
            preferences: rest.to_string(),
        }),
        "classify" => Ok(Action::Classify { image: Vec::new() }),
        "video" => Ok(Action::FindVideo {
            query: rest.to_string(),
        }),
        other => Err(format!(
            "Unknown command `{}`. Send `help` for the list.",
            other
        )),
    }
}

fn parse_favorites(args: &str) -> Result<Action, String> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "" | "list" => Ok(Action::ListFavorites),
        "add" => {
            let (name, recipe) = split_pipe(rest).ok_or(FAV_USAGE)?;
            Ok(Action::AddFavorite { name, recipe })
        }
        "update" => {
            let (id, rest) = split_word(rest);
            let id = parse_id(id).ok_or(FAV_USAGE)?;
            let (name, recipe) = split_pipe(rest).ok_or(FAV_USAGE)?;
            Ok(Action::UpdateFavorite { id, name, recipe })
        }
        "delete" => {
            let id = parse_id(rest).ok_or(FAV_USAGE)?;
            Ok(Action::DeleteFavorite { id })
        }
        _ => Err(FAV_USAGE.to_string()),
    }
}

fn parse_fridge(args: &str) -> Result<Action, String> {
    let (sub, rest) = split_word(args);
    match sub.to_lowercase().as_str() {
        "" | "list" => Ok(Action::ListProducts),
        "add" => {
            let (name, quantity) = split_quantity(rest).ok_or(FRIDGE_USAGE)?;
            Ok(Action::AddProduct { name, quantity })
        }
        "update" => {
            let (id, rest) = split_word(rest);
            let id = parse_id(id).ok_or(FRIDGE_USAGE)?;
            let (name, quantity) = split_quantity(rest).ok_or(FRIDGE_USAGE)?;
            Ok(Action::UpdateProduct { id, name, quantity })
        }
        "delete" => {
            let id = parse_id(rest).ok_or(FRIDGE_USAGE)?;
            Ok(Action::DeleteProduct { id })
        }
        _ => Err(FRIDGE_USAGE.to_string()),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn split_pipe(s: &str) -> Option<(String, String)> {
    let (name, text) = s.split_once('|')?;
    Some((name.trim().to_string(), text.trim().to_string()))
}

/// `<name words...> <qty>`; the quantity may be zero or negative here and is
/// validated by the store.
fn split_quantity(s: &str) -> Option<(String, i64)> {
    let (name, quantity) = s.trim().rsplit_once(char::is_whitespace)?;
    let quantity = quantity.parse().ok()?;
    Some((name.trim().to_string(), quantity))
}

fn parse_id(s: &str) -> Option<i64> {
    s.trim().trim_start_matches('#').parse().ok()
}
