use xml::namespace::Namespace;

/// Namespaces in scope for every open element, so that only bindings an
/// element introduces itself are written out again.
#[derive(Debug, Default)]
pub struct Scopes {
    stack: Vec<Namespace>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the element's scope and returns the bindings it adds to its parent's.
    pub fn enter(&mut self, namespace: &Namespace) -> Namespace {
        let mut introduced = Namespace::empty();
        for (prefix, uri) in namespace {
            let inherited = self.stack.last().and_then(|parent| parent.get(prefix));
            if inherited != Some(uri) {
                introduced.put(prefix, uri);
            }
        }
        self.stack.push(namespace.clone());
        introduced
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }
}
