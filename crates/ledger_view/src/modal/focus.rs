/// Kind of element inside the dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    Input,
    Select,
    TextArea,
    Other,
}

/// An element of the dialog as seen by the focus trap, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Focusable<T> {
    pub target: T,
    pub kind: ElementKind,
    pub tab_index: Option<i32>,
    pub disabled: bool,
}

impl<T> Focusable<T> {
    pub fn new(target: T, kind: ElementKind) -> Self {
        Self {
            target,
            kind,
            tab_index: None,
            disabled: false,
        }
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Buttons, links and form controls take focus unless their tab index is
    /// negative; any other element needs a non-negative tab index. Disabled
    /// elements never do.
    pub fn is_focusable(&self) -> bool {
        if self.disabled {
            return false;
        }
        match self.kind {
            ElementKind::Button
            | ElementKind::Link
            | ElementKind::Input
            | ElementKind::Select
            | ElementKind::TextArea => self.tab_index.is_none_or(|index| index >= 0),
            ElementKind::Other => self.tab_index.is_some_and(|index| index >= 0),
        }
    }
}

pub(crate) fn first_focusable<T>(elements: &[Focusable<T>]) -> Option<&T> {
    elements
        .iter()
        .find(|element| element.is_focusable())
        .map(|element| &element.target)
}

/// Target that `Tab` (or `Shift+Tab` when `backwards`) moves to from
/// `current`, wrapping at both ends. Focus outside the dialog enters it at
/// the first (or last) element.
pub(crate) fn cycle_focus<'a, T: PartialEq>(
    elements: &'a [Focusable<T>],
    current: Option<&T>,
    backwards: bool,
) -> Option<&'a T> {
    let order: Vec<&T> = elements
        .iter()
        .filter(|element| element.is_focusable())
        .map(|element| &element.target)
        .collect();
    let len = order.len();
    if len == 0 {
        return None;
    }

    let position = current.and_then(|current| order.iter().position(|t| *t == current));
    let next = match (position, backwards) {
        (None, false) => 0,
        (None, true) => len - 1,
        (Some(index), false) => (index + 1) % len,
        (Some(index), true) => (index + len - 1) % len,
    };
    Some(order[next])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements() -> Vec<Focusable<&'static str>> {
        vec![
            Focusable::new("heading", ElementKind::Other),
            Focusable::new("name", ElementKind::Input),
            Focusable::new("help", ElementKind::Other).with_tab_index(0),
            Focusable::new("hidden", ElementKind::Other).with_tab_index(-1),
            Focusable::new("locked", ElementKind::Button).disabled(true),
            Focusable::new("save", ElementKind::Button),
        ]
    }

    #[test]
    fn negative_tab_index_removes_controls() {
        let elements = vec![
            Focusable::new("name", ElementKind::Input),
            Focusable::new("skipped", ElementKind::Input).with_tab_index(-1),
            Focusable::new("more", ElementKind::Link).with_tab_index(-1),
            Focusable::new("save", ElementKind::Button).with_tab_index(0),
        ];
        assert!(!elements[1].is_focusable());
        assert!(!elements[2].is_focusable());
        assert_eq!(cycle_focus(&elements, Some(&"name"), false), Some(&"save"));
        assert_eq!(cycle_focus(&elements, Some(&"save"), true), Some(&"name"));
    }

    #[test]
    fn focusable_rules() {
        let elements = elements();
        let focusable: Vec<_> = elements
            .iter()
            .filter(|e| e.is_focusable())
            .map(|e| e.target)
            .collect();
        assert_eq!(focusable, ["name", "help", "save"]);
    }

    #[test]
    fn tab_wraps_from_last_to_first() {
        let elements = elements();
        assert_eq!(cycle_focus(&elements, Some(&"name"), false), Some(&"help"));
        assert_eq!(cycle_focus(&elements, Some(&"save"), false), Some(&"name"));
    }

    #[test]
    fn shift_tab_wraps_from_first_to_last() {
        let elements = elements();
        assert_eq!(cycle_focus(&elements, Some(&"name"), true), Some(&"save"));
        assert_eq!(cycle_focus(&elements, Some(&"save"), true), Some(&"help"));
    }

    #[test]
    fn focus_outside_enters_at_the_edges() {
        let elements = elements();
        assert_eq!(cycle_focus(&elements, Some(&"table"), false), Some(&"name"));
        assert_eq!(cycle_focus(&elements, None, true), Some(&"save"));
        assert_eq!(first_focusable(&elements), Some(&"name"));
    }

    #[test]
    fn no_focusable_elements() {
        let elements = vec![Focusable::new("text", ElementKind::Other)];
        assert_eq!(cycle_focus(&elements, None, false), None);
        assert_eq!(first_focusable(&elements), None);
    }
}
