use std::{collections::{BTreeMap, HashMap}, rc::Rc};

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::{
    ast::Expr,
    error::PersistError,
    interpreter::{
        evaluator::function::core::builtin,
        scope::Scope,
        value::{
            array::NdArray,
            core::Value,
            function::{Function, UserFunction},
        },
    },
    util::num::float_repr,
};

/// Element type recorded for arrays.
pub const FLOAT64: &str = "float64";

/// A scope graph in transportable form.
///
/// Every scope and every function appears once, in a table, and is referred
/// to by its index there. A parent always precedes its children, so a
/// snapshot can be rebuilt front to back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All scopes reachable from the root.
    pub scopes:    Vec<ScopeRecord>,
    /// All functions bound in those scopes.
    pub functions: Vec<FunctionRecord>,
    /// Index of the scope that was saved.
    pub root:      usize,
}

/// One scope and its own bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeRecord {
    /// Index of the enclosing scope.
    pub parent:  Option<usize>,
    /// Bindings by name.
    pub symbols: BTreeMap<String, BindingRecord>,
}

/// A single binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingRecord {
    /// The bound value.
    pub value:   ValueRecord,
    /// Whether the binding may be reassigned or deleted.
    pub mutable: bool,
}

/// A value, with functions replaced by their table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueRecord {
    /// A number; non-finite values are written as strings.
    Number {
        /// The number.
        #[serde(with = "float_repr")]
        value: f64,
    },
    /// An array as its element type, shape and little-endian element bytes
    /// in base64.
    Array {
        /// Always [`FLOAT64`].
        dtype: String,
        /// Length of each axis.
        shape: Vec<usize>,
        /// Base64 of the row-major elements.
        data:  String,
    },
    /// A reference into [`Snapshot::functions`].
    Function {
        /// The table index.
        index: usize,
    },
    /// A word list.
    WordList {
        /// The names.
        words: Vec<String>,
    },
}

/// A function, with its defining scope replaced by a table index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunctionRecord {
    /// A closure.
    User {
        /// Display name.
        name:   String,
        /// Parameter names.
        params: Vec<String>,
        /// The body.
        body:   Expr,
        /// Index of the defining scope.
        scope:  usize,
    },
    /// A built-in, re-bound by name on load.
    Builtin {
        /// Name in the built-in table.
        name: String,
    },
}

/// Records `root` and everything reachable from it.
///
/// Scopes and functions are keyed by `Rc` identity, so a scope shared by
/// several closures, or a closure bound inside its own defining scope, is
/// recorded once.
///
/// # Example
/// ```
/// use combicalc::interpreter::{persist, scope::Scope, value::core::Value};
///
/// let scope = Scope::global();
/// scope.set_value("x", Value::Number(2.0), true);
///
/// let snapshot = persist::serialize(&scope);
/// let restored = persist::deserialize(&snapshot).unwrap();
///
/// assert_eq!(restored.lookup("x"), Ok(Value::Number(2.0)));
/// ```
#[must_use]
pub fn serialize(root: &Rc<Scope>) -> Snapshot {
    let mut writer = Writer::default();
    let root = writer.scope(root);

    tracing::debug!(scopes = writer.scopes.len(),
                    functions = writer.functions.len(),
                    "serialized scope graph");

    Snapshot { scopes: writer.scopes,
               functions: writer.functions,
               root }
}

/// Rebuilds the scope graph recorded in `snapshot` and returns its root.
///
/// Built-ins are looked up in the native table by name.
///
/// # Errors
/// - [`PersistError::DanglingReference`] if an index points outside its
///   table, or a parent does not precede its child.
/// - [`PersistError::UnknownBuiltin`] if a built-in no longer exists.
/// - [`PersistError::ArrayData`] if array data cannot be decoded.
pub fn deserialize(snapshot: &Snapshot) -> Result<Rc<Scope>, PersistError> {
    let mut scopes: Vec<Rc<Scope>> = Vec::with_capacity(snapshot.scopes.len());
    for (index, record) in snapshot.scopes.iter().enumerate() {
        let scope = match record.parent {
            Some(parent) if parent < index => Scope::child(&scopes[parent]),
            Some(parent) => {
                return Err(PersistError::DanglingReference { kind:  "scope",
                                                             index: parent, });
            },
            None => Scope::root(),
        };
        scopes.push(scope);
    }

    let functions = snapshot.functions
                            .iter()
                            .map(|record| restore_function(record, &scopes))
                            .collect::<Result<Vec<_>, _>>()?;

    for (scope, record) in scopes.iter().zip(&snapshot.scopes) {
        for (name, binding) in &record.symbols {
            let value = restore_value(&binding.value, &functions)?;
            scope.force_value(name, value, binding.mutable);
        }
    }

    let root = lookup(&scopes, snapshot.root, "scope")?;
    Ok(Rc::clone(root))
}

/// Writes a snapshot as pretty-printed JSON.
///
/// # Errors
/// Returns [`PersistError::Json`] if serialization fails.
pub fn to_json(snapshot: &Snapshot) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Reads a snapshot from JSON.
///
/// # Errors
/// Returns [`PersistError::Json`] if the text is not a snapshot.
pub fn from_json(text: &str) -> Result<Snapshot, PersistError> {
    Ok(serde_json::from_str(text)?)
}

#[derive(Default)]
struct Writer {
    scopes:       Vec<ScopeRecord>,
    functions:    Vec<FunctionRecord>,
    scope_ids:    HashMap<*const Scope, usize>,
    function_ids: HashMap<*const Function, usize>,
}

impl Writer {
    fn scope(&mut self, scope: &Rc<Scope>) -> usize {
        if let Some(&id) = self.scope_ids.get(&Rc::as_ptr(scope)) {
            return id;
        }

        let parent = scope.parent().map(|parent| self.scope(parent));
        let id = self.scopes.len();
        self.scopes.push(ScopeRecord { parent,
                                       symbols: BTreeMap::new() });
        self.scope_ids.insert(Rc::as_ptr(scope), id);

        let symbols = scope.bindings()
                           .into_iter()
                           .map(|(name, binding)| {
                               (name,
                                BindingRecord { value:   self.value(&binding.value),
                                                mutable: binding.mutable, })
                           })
                           .collect();
        self.scopes[id].symbols = symbols;
        id
    }

    fn function(&mut self, function: &Rc<Function>) -> usize {
        if let Some(&id) = self.function_ids.get(&Rc::as_ptr(function)) {
            return id;
        }

        let id = self.functions.len();
        self.functions.push(FunctionRecord::Builtin { name: function.name().to_string() });
        self.function_ids.insert(Rc::as_ptr(function), id);

        if let Function::User(user) = &**function {
            let scope = self.scope(&user.scope);
            self.functions[id] = FunctionRecord::User { name: user.name.clone(),
                                                        params: user.params.clone(),
                                                        body: Expr::clone(&user.body),
                                                        scope };
        }
        id
    }

    fn value(&mut self, value: &Value) -> ValueRecord {
        match value {
            Value::Number(value) => ValueRecord::Number { value: *value },
            Value::Array(array) => {
                let bytes = array.data().iter().flat_map(|x| x.to_le_bytes()).collect::<Vec<_>>();
                ValueRecord::Array { dtype: FLOAT64.to_string(),
                                     shape: array.shape().to_vec(),
                                     data:  general_purpose::STANDARD.encode(bytes), }
            },
            Value::Function(function) => ValueRecord::Function { index: self.function(function) },
            Value::WordList(words) => ValueRecord::WordList { words: words.clone() },
        }
    }
}

fn lookup<'a, T>(table: &'a [T], index: usize, kind: &'static str) -> Result<&'a T, PersistError> {
    table.get(index)
         .ok_or(PersistError::DanglingReference { kind, index })
}

fn restore_function(record: &FunctionRecord, scopes: &[Rc<Scope>]) -> Result<Rc<Function>, PersistError> {
    let function = match record {
        FunctionRecord::User { name, params, body, scope } => {
            Function::User(UserFunction { name:   name.clone(),
                                          params: params.clone(),
                                          body:   Rc::new(body.clone()),
                                          scope:  Rc::clone(lookup(scopes, *scope, "scope")?), })
        },
        FunctionRecord::Builtin { name } => {
            Function::Builtin(builtin(name).ok_or_else(|| PersistError::UnknownBuiltin { name: name.clone() })?)
        },
    };
    Ok(Rc::new(function))
}

fn restore_value(record: &ValueRecord, functions: &[Rc<Function>]) -> Result<Value, PersistError> {
    match record {
        ValueRecord::Number { value } => Ok(Value::Number(*value)),
        ValueRecord::Array { dtype, shape, data } => Ok(decode_array(dtype, shape, data)?.into()),
        ValueRecord::Function { index } => {
            Ok(Value::Function(Rc::clone(lookup(functions, *index, "function")?)))
        },
        ValueRecord::WordList { words } => Ok(Value::WordList(words.clone())),
    }
}

fn decode_array(dtype: &str, shape: &[usize], data: &str) -> Result<NdArray, PersistError> {
    if dtype != FLOAT64 {
        return Err(PersistError::ArrayData { details: format!("unsupported dtype '{dtype}'") });
    }

    let bytes = general_purpose::STANDARD.decode(data)
                                         .map_err(|e| PersistError::ArrayData { details: e.to_string() })?;
    let chunks = bytes.chunks_exact(8);
    if !chunks.remainder().is_empty() {
        return Err(PersistError::ArrayData { details: format!("{} bytes do not hold whole float64 values",
                                                              bytes.len()) });
    }

    let elements = chunks.map(|chunk| {
                             let mut buffer = [0; 8];
                             buffer.copy_from_slice(chunk);
                             f64::from_le_bytes(buffer)
                         })
                         .collect();

    NdArray::new(shape.to_vec(), elements).map_err(|e| PersistError::ArrayData { details: e.to_string() })
}
