// Option lists for the project and freqmode selectors
use serde::Serialize;
use serde_json::Value;

/// How a selector is filled from one API response.
#[derive(Debug, Clone, Default)]
pub struct SelectorSettings {
    /// Disabled `-- title --` heading; for `Name` keys also prefixes each value as `title/name`.
    pub title: Option<String>,
    /// Disabled message shown when the response has no entries.
    pub empty: Option<String>,
    /// Disabled message shown when the request failed.
    pub fail: Option<String>,
    /// Response field supplying both value and text of each option.
    pub item_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: Option<String>,
    pub text: String,
    pub disabled: bool,
}

impl SelectOption {
    pub fn enabled(value: String) -> Self {
        Self {
            text: value.clone(),
            value: Some(value),
            disabled: false,
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            value: None,
            text: text.into(),
            disabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

/// Options contributed by one response, or by its failure.
pub fn populate<E>(settings: &SelectorSettings, response: Result<&[Value], E>) -> Vec<SelectOption> {
    let mut options = Vec::new();
    if let Some(title) = &settings.title {
        options.push(SelectOption::disabled(format!("-- {} --", title)));
    }

    let items = match response {
        Ok(items) => items,
        Err(_) => {
            if let Some(fail) = &settings.fail {
                options.push(SelectOption::disabled(fail.clone()));
            }
            return options;
        }
    };

    if items.is_empty() {
        if let Some(empty) = &settings.empty {
            options.push(SelectOption::disabled(empty.clone()));
        }
        return options;
    }

    for item in items {
        let Some(value) = item.get(&settings.item_key).and_then(value_text) else {
            tracing::warn!("Selector item without {}: {}", settings.item_key, item);
            continue;
        };
        let value = match (&settings.title, settings.item_key.as_str()) {
            (Some(title), "Name") => format!("{}/{}", title, value),
            _ => value,
        };
        options.push(SelectOption::enabled(value));
    }

    options
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
