use std::collections::BTreeMap;

use super::{
    CommonTarget, DarwinTarget, JsTarget, JvmTarget, Language, ProjectHook, TargetConfiguration,
    TargetKind,
};

/// At most one [`TargetConfiguration`] per [`TargetKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    slots: BTreeMap<TargetKind, TargetConfiguration>,
}

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `target` into the slot for its kind, returning what was there.
    pub fn insert(&mut self, target: TargetConfiguration) -> Option<TargetConfiguration> {
        self.slots.insert(target.kind(), target)
    }

    pub fn get(&self, kind: TargetKind) -> Option<&TargetConfiguration> {
        self.slots.get(&kind)
    }

    pub fn contains(&self, kind: TargetKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TargetKind> + '_ {
        self.slots.keys().copied()
    }

    /// Occupied slots in [`TargetKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetConfiguration> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn common(&self) -> Option<&CommonTarget> {
        match self.get(TargetKind::Common) {
            Some(TargetConfiguration::Common(t)) => Some(t),
            _ => None,
        }
    }

    pub fn jvm(&self) -> Option<&JvmTarget> {
        match self.get(TargetKind::Jvm) {
            Some(TargetConfiguration::Jvm(t)) => Some(t),
            _ => None,
        }
    }

    pub fn js(&self) -> Option<&JsTarget> {
        match self.get(TargetKind::Js) {
            Some(TargetConfiguration::Js(t)) => Some(t),
            _ => None,
        }
    }

    pub fn darwin(&self) -> Option<&DarwinTarget> {
        match self.get(TargetKind::Darwin) {
            Some(TargetConfiguration::Darwin(t)) => Some(t),
            _ => None,
        }
    }
}

impl FromIterator<TargetConfiguration> for Targets {
    /// Later targets of the same kind replace earlier ones.
    fn from_iter<I: IntoIterator<Item = TargetConfiguration>>(iter: I) -> Self {
        let mut targets = Targets::new();
        for target in iter {
            targets.insert(target);
        }
        targets
    }
}

/// Everything a single module declaration resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfiguration {
    pub(crate) description: Option<String>,
    pub(crate) publishing_enabled: bool,
    pub(crate) publish_single_target_as_module: bool,
    pub(crate) language: Language,
    pub(crate) targets: Targets,
    pub(crate) custom_hooks: Vec<ProjectHook>,
}

impl Default for ModuleConfiguration {
    /// Publishing on, no language settings, only the implicit common target.
    fn default() -> Self {
        Self {
            description: None,
            publishing_enabled: true,
            publish_single_target_as_module: false,
            language: Language::default(),
            targets: [TargetConfiguration::empty(TargetKind::Common)]
                .into_iter()
                .collect(),
            custom_hooks: Vec::new(),
        }
    }
}

impl ModuleConfiguration {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn publishing_enabled(&self) -> bool {
        self.publishing_enabled
    }

    pub fn publish_single_target_as_module(&self) -> bool {
        self.publish_single_target_as_module
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn custom_hooks(&self) -> &[ProjectHook] {
        &self.custom_hooks
    }
}
