use serde::{Deserialize, Serialize};

/// Identity a plugin reports to its host. Fixed for the life of the plugin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    name: String,
    title: String,
    author: String,
    description: String,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
        }
    }

    /// Machine-readable identifier, unique within a host.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
