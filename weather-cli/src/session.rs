use anyhow::{Result, anyhow};
use inquire::{InquireError, Select, Text, error::InquireResult, list_option::ListOption};
use std::{sync::Arc, time::Duration};
use weather_core::{
    ProxyClient,
    search::{SearchController, SearchHandle, SearchView},
};

use crate::render::ThemeScope;

const PROMPT: &str = "Enter city or postal code:";

/// Interactive search: type a place, pick a suggestion, see the weather.
///
/// Each submitted line is one change of the input field. Empty input or Esc
/// ends the session.
pub async fn run(client: ProxyClient, quiet_period: Duration) -> Result<()> {
    let mut handle = SearchController::spawn(Arc::new(client), quiet_period);
    let mut scope = ThemeScope::new(None);

    println!("Climate Now - real-time weather information");

    while let Some(text) = prompt_input(handle.view().input).await? {
        handle.input_changed(text);
        let view = settled(&mut handle).await?;

        if view.suggestions.is_empty() {
            // Enter with nothing to pick from.
            handle.commit();
            print_error(&settled(&mut handle).await?);
            continue;
        }

        let Some(index) = prompt_selection(view.suggestions).await? else {
            continue;
        };

        handle.select(index);
        // The field now shows the selected label; report that as its new value.
        let label = settled(&mut handle).await?.input;
        handle.input_changed(label);

        let view = settled(&mut handle).await?;
        print_error(&view);
        scope.set(view.theme);
        if let Some(panel) = &view.weather {
            scope.print_panel(panel);
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn settled(handle: &mut SearchHandle) -> Result<SearchView> {
    handle.settled().await.ok_or_else(|| anyhow!("search controller stopped unexpectedly"))
}

fn print_error(view: &SearchView) {
    if let Some(error) = &view.error {
        eprintln!("{error}");
    }
}

async fn prompt_input(initial: String) -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(move || {
        Text::new(PROMPT).with_initial_value(&initial).prompt_skippable()
    })
    .await?;

    match answer {
        Ok(Some(text)) if !text.trim().is_empty() => Ok(Some(text)),
        Ok(_) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn prompt_selection(options: Vec<String>) -> Result<Option<usize>> {
    let answer = tokio::task::spawn_blocking(move || {
        Select::new("Select a location:", options).raw_prompt()
    })
    .await?;

    chosen_index(answer)
}

/// Cancelling the list is not an error; it just means no selection.
fn chosen_index(answer: InquireResult<ListOption<String>>) -> Result<Option<usize>> {
    match answer {
        Ok(choice) => Ok(Some(choice.index)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_index_maps_cancel_to_none() {
        let picked = ListOption::new(2, "Sydney, AU".to_string());
        assert_eq!(chosen_index(Ok(picked)).unwrap(), Some(2));

        assert_eq!(chosen_index(Err(InquireError::OperationCanceled)).unwrap(), None);
        assert_eq!(chosen_index(Err(InquireError::OperationInterrupted)).unwrap(), None);
        assert!(chosen_index(Err(InquireError::NotTTY)).is_err());
    }
}
