//! Scenario catalog.
//!
//! Each scenario key maps to a literal declaration document. The catalog is
//! a closed enumeration rather than a string-keyed map, so an unknown key
//! is a compile error instead of a silent empty-string fallback, and every
//! match over keys is checked for exhaustiveness.
//!
//! Documents are opaque to this crate: they are handed to the configuration
//! engine verbatim, never parsed or validated here.

use serde::{Deserialize, Serialize};

/// The fixed set of acceptance scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScenarioKey {
    /// Creates a slack endpoint and a derived output referencing its id.
    SlackHappyPath,
    /// Declares a slack endpoint with an invalid URL; apply must be
    /// rejected.
    SlackBadUrl,
    /// Re-declares the slack endpoint with an updated title.
    SlackUpdateHappyPath,
    /// Creates a custom endpoint with method, headers, and a body template.
    CustomHappyPath,
}

impl ScenarioKey {
    /// Every catalog entry, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::SlackHappyPath,
        Self::SlackBadUrl,
        Self::SlackUpdateHappyPath,
        Self::CustomHappyPath,
    ];

    /// The catalog key as its external string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SlackHappyPath => "slackHappyPath",
            Self::SlackBadUrl => "slackBadUrl",
            Self::SlackUpdateHappyPath => "slackUpdateHappyPath",
            Self::CustomHappyPath => "customHappyPath",
        }
    }

    /// The literal declaration document for this scenario.
    #[must_use]
    pub const fn document(self) -> &'static str {
        match self {
            Self::SlackHappyPath => {
                r#"
resource "logzio_endpoint" "slack" {
  title = "my_slack_title"
  endpoint_type = "slack"
  description = "this_is_my_description"
  slack {
    url = "https://www.test.com"
  }
}

output "test" {
    value = "${logzio_endpoint.slack.endpoint_id}"
}
"#
            }
            Self::SlackBadUrl => {
                r#"
resource "logzio_endpoint" "slack" {
  title = "my_slack_title"
  endpoint_type = "slack"
  description = "this_is_my_description"
  slack {
    url = "https://not_a_url"
  }
}
"#
            }
            Self::SlackUpdateHappyPath => {
                r#"
resource "logzio_endpoint" "slack" {
  title = "my_updated_slack_title"
  endpoint_type = "slack"
  description = "this_is_my_description"
  slack {
    url = "https://www.test.com"
  }
}
"#
            }
            Self::CustomHappyPath => {
                r#"
resource "logzio_endpoint" "custom" {
  title = "my_custom_title"
  endpoint_type = "custom"
  description = "this_is_my_description"
  custom {
    url = "https://www.test.com"
    method = "POST"
    headers = {
        "this" = "is"
        "a" = "header"
    }
    body_template = "this_is_my_template"
  }
}
"#
            }
        }
    }
}

impl std::fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
