//! Suggested automation cards for a notebook's studio view.

use crate::domain::{Automation, AutomationCategory, Notebook};

/// Suggestions that depend on what the notebook contains come first,
/// followed by the ones offered for every notebook.
pub fn suggest_automations(notebook: &Notebook) -> Vec<Automation> {
    let card = |n: u8, title: &str, description: &str, category| Automation {
        id: format!("gen-{}-{}", notebook.id, n),
        notebook_id: notebook.id.clone(),
        title: title.to_string(),
        description: description.to_string(),
        category,
    };

    let mut automations = Vec::new();

    if !notebook.sources.is_empty() {
        automations.push(card(
            1,
            "Generate Summary",
            "Create a concise summary of all your sources in this notebook.",
            AutomationCategory::Summary,
        ));
    }

    if !notebook.messages.is_empty() {
        automations.push(card(
            2,
            "Extract Key Insights",
            "Identify and extract the most important insights from your conversations.",
            AutomationCategory::Analysis,
        ));
    }

    automations.push(card(
        3,
        "Schedule Weekly Review",
        "Set up a weekly reminder to review and update this notebook.",
        AutomationCategory::Reminder,
    ));
    automations.push(card(
        4,
        "Create Study Guide",
        "Transform your notebook into a structured study guide with practice questions.",
        AutomationCategory::Organization,
    ));
    automations.push(card(
        5,
        "Set Up Regular Updates",
        "Automatically check for updates to your sources and notify you of changes.",
        AutomationCategory::Reminder,
    ));

    automations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Message, Role, Source, SourceKind};
    use chrono::Utc;

    fn notebook() -> Notebook {
        Notebook {
            id: "nb".to_string(),
            title: "Research".to_string(),
            emoji: None,
            sources: Vec::new(),
            messages: Vec::new(),
            last_updated: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn titles(automations: &[Automation]) -> Vec<&str> {
        automations.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn empty_notebooks_only_get_generic_suggestions() {
        let automations = suggest_automations(&notebook());
        assert_eq!(
            titles(&automations),
            ["Schedule Weekly Review", "Create Study Guide", "Set Up Regular Updates"]
        );
        assert_eq!(automations[0].id, "gen-nb-3");
        assert!(automations.iter().all(|a| a.notebook_id == "nb"));
    }

    #[test]
    fn content_unlocks_summary_and_insights() {
        let mut nb = notebook();
        nb.sources.push(Source {
            id: "s1".to_string(),
            kind: SourceKind::Text,
            title: "notes".to_string(),
            content: Some("text".to_string()),
            url: None,
            date_added: Utc::now(),
        });
        nb.messages.push(Message {
            id: "m1".to_string(),
            role: Role::User,
            content: "hi".to_string(),
            timestamp: Utc::now(),
            citations: Vec::new(),
        });

        let automations = suggest_automations(&nb);
        assert_eq!(automations.len(), 5);
        assert_eq!(automations[0].category, AutomationCategory::Summary);
        assert_eq!(automations[1].title, "Extract Key Insights");
        assert_eq!(automations[1].id, "gen-nb-2");
    }
}
