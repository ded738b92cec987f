use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr, Line, Program},
    error::RuntimeError,
    interpreter::{
        Config,
        scope::Scope,
        value::{array::NdArray, core::Value, function::{Function, UserFunction}},
    },
    util::stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation state.
///
/// Names live in [`Scope`]s passed alongside every expression, so the context
/// itself only carries the configuration and the current nesting depth.
///
/// ## Usage
///
/// A `Context` is created once per session and reused for every program.
/// Every nested expression evaluation counts one level of depth; exceeding
/// [`Config::max_depth`] fails with
/// [`RuntimeError::RecursionDepthExceeded`]. The stack grows on the heap as
/// evaluation nests, so any thread can evaluate up to the limit.
#[derive(Debug, Default)]
pub struct Context {
    /// Limits applied during evaluation.
    pub config: Config,
    depth:      usize,
}

impl Context {
    /// Creates a context with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, depth: 0 }
    }

    /// Current expression nesting depth; `0` between evaluations.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluates every line of a program in order.
    ///
    /// Lines commit their bindings as they succeed; a failing line leaves the
    /// bindings of earlier lines in place.
    ///
    /// # Returns
    /// The value of the last line, or `None` if it has none.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::{
    ///     evaluator::core::Context, parser::parse, scope::Scope, value::core::Value,
    /// };
    ///
    /// let mut context = Context::default();
    /// let scope = Scope::global();
    ///
    /// let program = parse("x = 4; 2x + 1").unwrap();
    /// let value = context.eval_program(&program, &scope).unwrap();
    ///
    /// assert_eq!(value, Some(Value::Number(9.0)));
    /// ```
    pub fn eval_program(&mut self, program: &Program, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        let mut result = None;
        for line in &program.lines {
            result = self.eval_line(line, scope)?;
        }
        Ok(result)
    }

    /// Evaluates a single line.
    ///
    /// - A variable definition evaluates its expression once and binds the
    ///   value under every name, left to right. Its value is the assigned
    ///   value.
    /// - A function definition binds a closure over `scope` and has no value.
    /// - An expression line has the expression's value.
    pub fn eval_line(&mut self, line: &Line, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        match line {
            Line::VarDef { names, value } => {
                let value = self.eval_value(value, scope, "a variable")?;
                for name in names {
                    scope.set_value(name, value.clone(), true);
                }
                Ok(Some(value))
            },
            Line::FunctionDef { name, params, body } => {
                let function = UserFunction { name:   name.clone(),
                                              params: params.clone(),
                                              body:   Rc::clone(body),
                                              scope:  Rc::clone(scope), };
                scope.set_value(name, Function::User(function).into(), true);
                Ok(None)
            },
            Line::Expression(expr) => self.eval(expr, scope),
        }
    }

    /// Evaluates an expression in `scope`.
    ///
    /// This is the main entry point for expression evaluation. It guards the
    /// nesting depth and dispatches on the expression variant.
    ///
    /// # Returns
    /// `Some(Value)` for expressions that produce a value, or `None` for the
    /// empty expression and for calls whose body is empty.
    pub fn eval(&mut self, expr: &Expr, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::RecursionDepthExceeded { limit: self.config.max_depth });
        }

        self.depth += 1;
        let result = stack::grow(|| self.dispatch(expr, scope));
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, expr: &Expr, scope: &Rc<Scope>) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Empty => Ok(None),
            Expr::Number(n) => Ok(Some(Value::Number(*n))),
            Expr::WordList(words) => Ok(Some(Value::WordList(words.clone()))),
            Expr::Name(words) => scope.lookup(&words.join(".")).map(Some),
            Expr::Infix { operands, operators } => {
                self.eval_infix(operands, operators, scope).map(Some)
            },
            Expr::Unary { operators, operand } => {
                self.eval_unary(operators, operand, scope).map(Some)
            },
            Expr::ImplicitMult(factors) => self.eval_implicit_mult(factors, scope).map(Some),
            Expr::Array(elements) => self.eval_array(elements, scope).map(Some),
            Expr::Call { callee, groups } => self.eval_call(callee, groups, scope),
            Expr::Index { base, subscripts } => self.eval_index(base, subscripts, scope).map(Some),
        }
    }

    /// Folds a flat operator chain from the left.
    ///
    /// Every operand is evaluated, in order; `and` and `or` do not
    /// short-circuit.
    fn eval_infix(&mut self,
                  operands: &[Expr],
                  operators: &[BinaryOperator],
                  scope: &Rc<Scope>)
                  -> EvalResult<Value> {
        let Some((first, rest)) = operands.split_first() else {
            return Err(RuntimeError::EmptyValue { context: "an operand" });
        };

        let mut accumulator = self.eval_value(first, scope, "an operand")?;
        for (operator, operand) in operators.iter().zip(rest) {
            let right = self.eval_value(operand, scope, "an operand")?;
            accumulator = Self::eval_binary(*operator, &accumulator, &right)?;
        }
        Ok(accumulator)
    }

    /// Multiplies adjacent operands, left to right.
    fn eval_implicit_mult(&mut self, factors: &[Expr], scope: &Rc<Scope>) -> EvalResult<Value> {
        let Some((first, rest)) = factors.split_first() else {
            return Err(RuntimeError::EmptyValue { context: "a factor" });
        };

        let mut product = self.eval_value(first, scope, "a factor")?;
        for factor in rest {
            let right = self.eval_value(factor, scope, "a factor")?;
            product = Self::eval_binary(BinaryOperator::Mul, &product, &right)?;
        }
        Ok(product)
    }

    /// Evaluates an array literal by stacking its elements.
    ///
    /// Elements must be numbers or arrays of one common shape; `[]` is the
    /// empty array of shape `[0]`.
    fn eval_array(&mut self, elements: &[Expr], scope: &Rc<Scope>) -> EvalResult<Value> {
        let items = elements.iter()
                            .map(|element| {
                                self.eval_value(element, scope, "an array element")?
                                    .to_array("an array element")
                            })
                            .collect::<EvalResult<Vec<_>>>()?;

        Ok(Value::Array(Rc::new(NdArray::stack(&items)?)))
    }
}
