//! Runtime values for the Rill interpreter.
//!
//! `Value` is the single dynamic type flowing through evaluation.  Callables
//! come in three shapes: native builtins, user functions (an AST declaration
//! plus its captured closure), and classes (calling one constructs an
//! instance).  Functions, classes, and instances compare by identity;
//! everything else compares by value.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::stmt::FunctionDecl;

/// Signature of a native (built-in) function.
pub type NativeFn = fn(&[Value]) -> Result<Value, String>;

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,

    /// Marker stored for a `let` binding declared without an initializer.
    /// Distinct from `Nil` and unreachable from the language: reading a
    /// binding that still holds it is a runtime error.
    Uninit,

    NativeFunction {
        name: String,
        arity: usize,
        func: NativeFn,
    },

    Function(Rc<Function>),

    Class(Rc<Class>),

    Instance(Rc<RefCell<Instance>>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (
                Value::NativeFunction { name: a, func: f, .. },
                Value::NativeFunction { name: b, func: g, .. },
            ) => a == b && f == g,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Str(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),

            Value::Uninit => write!(f, "<uninitialized>"),

            Value::NativeFunction { name, .. } => write!(f, "<native fn {}>", name),

            Value::Function(fun) => write!(f, "<fn {}>", fun.decl.name.lexeme),

            Value::Class(class) => write!(f, "<class {}>", class.name),

            Value::Instance(instance) => {
                write!(f, "<{} instance>", instance.borrow().class().name)
            }
        }
    }
}

/// A user-defined function: its declaration plus the environment that was
/// current at its definition site.  Those two together are the complete,
/// immutable identity of the callable.
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,

    /// `init` methods always yield the constructed instance, whatever their
    /// body returns.
    pub is_initializer: bool,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    /// Produce a copy of this method bound to `instance`: a fresh frame
    /// holding `self` is spliced between the closure and the eventual call
    /// frame.  One freshly bound callable per property access.
    pub fn bind(&self, instance: &Rc<RefCell<Instance>>) -> Function {
        let mut env = Environment::with_enclosing(self.closure.clone());
        env.define("self", Value::Instance(instance.clone()));

        Function {
            decl: self.decl.clone(),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }
}

// Manual Debug: the closure chain can reach back to this function through
// the environment, so recursing into it would never terminate.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.decl.name.lexeme)
            .field("arity", &self.arity())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}

/// A class: its name and the (unbound) methods declared in its body.
pub struct Class {
    pub name: String,
    methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: String, methods: HashMap<String, Rc<Function>>) -> Self {
        Class { name, methods }
    }

    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        self.methods.get(name).cloned()
    }

    /// Calling a class takes whatever its `init` takes; zero otherwise.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class").field("name", &self.name).finish()
    }
}

/// An instance: a reference to its class plus a mutable field map.
/// Instances are created only by calling their class.
pub struct Instance {
    class: Rc<Class>,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Instance {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> Rc<Class> {
        self.class.clone()
    }

    /// Read a field from the instance's own map; methods are the caller's
    /// fallback (property lookup checks fields first).
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    /// Property write: always straight into the field map (a field may
    /// shadow a method of the same name).
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
