//! In-memory host VM used by the integration tests.
//!
//! Records declared classes and bound entry points, and drives them the
//! way an interpreter would: constructor frames hold only the arguments,
//! method frames put the receiver in slot 0.

#![allow(dead_code)]

use std::collections::HashMap;

use scriptbind::{CallContext, CallError, Finalizer, HostVm, InstanceHandle, InstanceTable, NativeFn, Value};

pub struct MockClass {
    pub name: String,
    pub scope: Option<usize>,
    pub allocate: Option<NativeFn>,
    pub finalize: Option<Finalizer>,
    pub methods: HashMap<String, (usize, NativeFn)>,
}

#[derive(Default)]
pub struct MockVm {
    pub classes: Vec<MockClass>,
    pub setter_prefix: Option<&'static str>,
    /// `(object, variable)` to the stored value and its class
    pub ivars: HashMap<(InstanceHandle, String), (usize, Value)>,
}

impl HostVm for MockVm {
    type Class = usize;

    fn define_class(&mut self, name: &str, scope: Option<usize>) -> usize {
        self.classes.push(MockClass {
            name: name.to_owned(),
            scope,
            allocate: None,
            finalize: None,
            methods: HashMap::new(),
        });
        self.classes.len() - 1
    }

    fn set_lifecycle(&mut self, class: usize, allocate: NativeFn, finalize: Finalizer) {
        let record = &mut self.classes[class];
        record.allocate = Some(allocate);
        record.finalize = Some(finalize);
    }

    fn define_method(&mut self, class: usize, name: &str, required: usize, entry: NativeFn) {
        self.classes[class].methods.insert(name.to_owned(), (required, entry));
    }

    fn set_instance_variable(&mut self, object: &Value, name: &str, class: usize, value: Value) {
        let owner = object
            .as_instance()
            .unwrap_or_else(|| panic!("{object:?} cannot hold instance variables"));
        self.ivars.insert((owner, name.to_owned()), (class, value));
    }

    fn instance_variable(&self, object: &Value, name: &str) -> Value {
        object
            .as_instance()
            .and_then(|owner| self.ivars.get(&(owner, name.to_owned())))
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Nil)
    }

    fn setter_name(&self, field: &str) -> String {
        match self.setter_prefix {
            Some(prefix) => format!("{prefix}{field}"),
            None => format!("{field}="),
        }
    }
}

impl MockVm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_named(&self, name: &str) -> usize {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .unwrap_or_else(|| panic!("class {name} not declared"))
    }

    /// `Class.new(args...)`
    pub fn new_object(&self, instances: &mut InstanceTable, class: usize, args: &[Value]) -> Result<Value, CallError> {
        let allocate = self.classes[class]
            .allocate
            .as_ref()
            .unwrap_or_else(|| panic!("class {class} has no lifecycle"));
        let mut ret = Value::Nil;
        let mut ctx = CallContext::new(args, 0, &mut ret, instances);
        allocate.call(&mut ctx)?;
        Ok(ret)
    }

    /// `receiver.name(args...)`, looked up on `class` itself.
    pub fn call(
        &self,
        instances: &mut InstanceTable,
        class: usize,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Value, CallError> {
        let (_, entry) = self
            .method(class, name)
            .unwrap_or_else(|| panic!("no method {name} on class {class}"));
        let mut slots = Vec::with_capacity(args.len() + 1);
        slots.push(receiver.clone());
        slots.extend_from_slice(args);

        let mut ret = Value::Nil;
        let mut ctx = CallContext::new(&slots, 1, &mut ret, instances);
        entry.call(&mut ctx)?;
        Ok(ret)
    }

    pub fn method(&self, class: usize, name: &str) -> Option<&(usize, NativeFn)> {
        self.classes[class].methods.get(name)
    }

    /// A bare namespace to declare classes under.
    pub fn define_module(&mut self, name: &str) -> usize {
        self.define_class(name, None)
    }

    /// `Outer::Inner` path of a declared class.
    pub fn qualified_name(&self, class: usize) -> String {
        let record = &self.classes[class];
        match record.scope {
            Some(scope) => format!("{}::{}", self.qualified_name(scope), record.name),
            None => record.name.clone(),
        }
    }

    /// Run the finalizer as the garbage collector would.
    pub fn collect(&self, instances: &mut InstanceTable, class: usize, object: &Value) -> bool {
        let finalize = self.classes[class]
            .finalize
            .unwrap_or_else(|| panic!("class {class} has no lifecycle"));
        match object.as_instance() {
            Some(handle) => finalize(instances, handle),
            None => false,
        }
    }

    /// Run the finalizer of the class a stored instance variable was tagged with.
    pub fn collect_variable(&self, instances: &mut InstanceTable, object: &Value, name: &str) -> bool {
        let Some(owner) = object.as_instance() else {
            return false;
        };
        match self.ivars.get(&(owner, name.to_owned())) {
            Some((class, value)) => self.collect(instances, *class, value),
            None => false,
        }
    }
}
