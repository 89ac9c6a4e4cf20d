use std::fmt;

/// Source of the script text the playground runs.
pub trait EditorSurface {
    fn current_text(&self) -> String;
}

impl EditorSurface for str {
    fn current_text(&self) -> String {
        self.to_owned()
    }
}

impl EditorSurface for String {
    fn current_text(&self) -> String {
        self.clone()
    }
}

/// Identifier returned by `ScriptBuffer::on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangeListener = Box<dyn FnMut(&str)>;

/// In-memory editor buffer that notifies listeners on every edit.
#[derive(Default)]
pub struct ScriptBuffer {
    text: String,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener: u64,
}

impl ScriptBuffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the whole buffer. Listeners only fire when the text changed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.notify();
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.push_str(text);
        self.notify();
    }

    pub fn on_change(&mut self, listener: impl FnMut(&str) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` when a listener was removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.text);
        }
    }
}

impl EditorSurface for ScriptBuffer {
    fn current_text(&self) -> String {
        self.text.clone()
    }
}

impl fmt::Debug for ScriptBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptBuffer")
            .field("text", &self.text)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{EditorSurface, ScriptBuffer};

    #[test]
    fn listeners_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut buffer = ScriptBuffer::new("let a = 1;");
        let sink = Rc::clone(&seen);
        let id = buffer.on_change(move |text| sink.borrow_mut().push(text.to_owned()));

        buffer.set_text("let a = 2;");
        buffer.set_text("let a = 2;");
        buffer.append("\nlet b = 3;");
        assert_eq!(
            *seen.borrow(),
            vec!["let a = 2;".to_owned(), "let a = 2;\nlet b = 3;".to_owned()]
        );

        assert!(buffer.remove_listener(id));
        assert!(!buffer.remove_listener(id));
        buffer.set_text("");
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(buffer.current_text(), "");
    }
}
