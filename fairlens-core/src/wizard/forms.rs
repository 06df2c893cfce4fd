//! Selector state for the metadata and mitigation forms.

/// A single-choice selector. `None` is the "Select ..." placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleSelect {
    options: Vec<String>,
    selected: Option<usize>,
}

impl SingleSelect {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn value(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].as_str())
    }

    /// Select by index; out-of-range clears the selection.
    pub fn select_index(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.options.len());
    }

    /// Select by value. Returns false if the value is not an option.
    pub fn select(&mut self, value: &str) -> bool {
        self.selected = self.options.iter().position(|o| o == value);
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// A checkbox list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelect {
    options: Vec<String>,
    checked: Vec<bool>,
}

impl MultiSelect {
    pub fn new(options: Vec<String>) -> Self {
        let checked = vec![false; options.len()];
        Self { options, checked }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(c) = self.checked.get_mut(index) {
            *c = !*c;
        }
    }

    /// Check or uncheck by value. Returns false if the value is not an option.
    pub fn set(&mut self, value: &str, checked: bool) -> bool {
        match self.options.iter().position(|o| o == value) {
            Some(i) => {
                self.checked[i] = checked;
                true
            }
            None => false,
        }
    }

    /// Checked values, in option order.
    pub fn selected(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, c)| **c)
            .map(|(o, _)| o.clone())
            .collect()
    }
}

/// Target / protected / feature selectors, filled from the uploaded columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataForm {
    pub target: SingleSelect,
    pub protected: MultiSelect,
    pub features: MultiSelect,
}

impl MetadataForm {
    pub fn from_columns(columns: &[String]) -> Self {
        Self {
            target: SingleSelect::new(columns.to_vec()),
            protected: MultiSelect::new(columns.to_vec()),
            features: MultiSelect::new(columns.to_vec()),
        }
    }

    pub fn target_value(&self) -> String {
        self.target.value().unwrap_or_default().to_string()
    }
}

/// Technique and attribute selectors. Hidden once a mitigation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MitigationForm {
    pub technique: SingleSelect,
    pub protected_attribute: SingleSelect,
    visible: bool,
}

impl MitigationForm {
    pub fn new(techniques: Vec<String>) -> Self {
        Self {
            technique: SingleSelect::new(techniques),
            protected_attribute: SingleSelect::default(),
            visible: true,
        }
    }

    /// Replace the attribute options; any previous choice is discarded.
    pub fn populate_attributes(&mut self, protected: &[String]) {
        self.protected_attribute = SingleSelect::new(protected.to_vec());
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> Vec<String> {
        vec!["age".into(), "gender".into(), "score".into()]
    }

    #[test]
    fn test_single_select() {
        let mut s = SingleSelect::new(cols());
        assert_eq!(s.value(), None);
        assert!(s.select("score"));
        assert_eq!(s.value(), Some("score"));
        assert!(!s.select("missing"));
        assert_eq!(s.value(), None);
        s.select_index(Some(7));
        assert_eq!(s.selected_index(), None);
    }

    #[test]
    fn test_multi_select_order_follows_options() {
        let mut m = MultiSelect::new(cols());
        m.toggle(2);
        m.toggle(0);
        assert_eq!(m.selected(), vec!["age", "score"]);
        m.toggle(2);
        assert_eq!(m.selected(), vec!["age"]);
        assert!(m.set("gender", true));
        assert!(!m.set("nope", true));
        assert!(m.is_checked(1));
    }

    #[test]
    fn test_metadata_form_from_columns() {
        let form = MetadataForm::from_columns(&cols());
        assert_eq!(form.target.options().len(), 3);
        assert_eq!(form.target_value(), "");
        assert!(form.protected.selected().is_empty());
    }

    #[test]
    fn test_mitigation_form_repopulate_clears_choice() {
        let mut form = MitigationForm::new(vec!["reweighing".into()]);
        form.populate_attributes(&["gender".into()]);
        assert!(form.protected_attribute.select("gender"));
        form.populate_attributes(&["region".into(), "caste".into()]);
        assert_eq!(form.protected_attribute.value(), None);
        assert_eq!(form.protected_attribute.options(), &["region", "caste"]);
    }
}
