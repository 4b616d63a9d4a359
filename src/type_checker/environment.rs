use std::collections::HashMap;

use crate::{
    ast::{ast::Program, types::Type},
    SourceLocation,
};

/// Parameter types (receiver included for methods) and return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub parameters: Vec<Type>,
    pub ret: Type,
}

impl FunctionSignature {
    pub fn new(parameters: Vec<Type>, ret: Type) -> Self {
        FunctionSignature { parameters, ret }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassInfo {
    pub fields: HashMap<String, Type>,
    pub methods: HashMap<String, FunctionSignature>,
}

/// Everything visible at module level: variables, functions and classes.
///
/// The environment is a plain value; checking a program never mutates the
/// environment it was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalTypeEnv {
    pub globals: HashMap<String, Type>,
    pub functions: HashMap<String, FunctionSignature>,
    pub classes: HashMap<String, ClassInfo>,
}

impl GlobalTypeEnv {
    /// An environment holding the builtin functions.
    pub fn builtins() -> Self {
        let mut functions = HashMap::new();

        functions.insert(String::from("abs"), FunctionSignature::new(vec![Type::Num], Type::Num));
        for name in ["max", "min", "pow"] {
            functions.insert(
                String::from(name),
                FunctionSignature::new(vec![Type::Num, Type::Num], Type::Num),
            );
        }
        functions.insert(
            String::from("print"),
            FunctionSignature::new(vec![Type::class("object")], Type::Num),
        );

        GlobalTypeEnv {
            functions,
            ..Default::default()
        }
    }

    /// Copies `self` and adds the signatures of every top-level declaration
    /// of `program`. Later declarations replace earlier ones.
    pub fn augment(&self, program: &Program<SourceLocation>) -> Self {
        let mut env = self.clone();

        for init in program.inits.iter() {
            env.globals.insert(init.name.clone(), init.ty.clone());
        }

        for fun in program.funs.iter() {
            env.functions.insert(
                fun.name.clone(),
                FunctionSignature::new(
                    fun.parameters.iter().map(|p| p.ty.clone()).collect(),
                    fun.ret.clone(),
                ),
            );
        }

        for class in program.classes.iter() {
            let fields = class
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.ty.clone()))
                .collect();
            let methods = class
                .methods
                .iter()
                .map(|method| {
                    (
                        method.name.clone(),
                        FunctionSignature::new(
                            method.parameters.iter().map(|p| p.ty.clone()).collect(),
                            method.ret.clone(),
                        ),
                    )
                })
                .collect();

            env.classes.insert(class.name.clone(), ClassInfo { fields, methods });
        }

        env
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// The element type produced by iterating over `ty`, if it is iterable.
    ///
    /// Lists, sets and generators yield their element type. A class is
    /// iterable when it declares both `next` and `hasnext`, yielding what
    /// `next` returns.
    pub fn iterable_element(&self, ty: &Type) -> Option<Type> {
        match ty {
            Type::List(element) | Type::Set(element) | Type::Generator(element) => {
                Some((**element).clone())
            }
            Type::Class { name, .. } => {
                let class = self.class(name)?;
                if !class.methods.contains_key("hasnext") {
                    return None;
                }
                class.methods.get("next").map(|next| next.ret.clone())
            }
            _ => None,
        }
    }
}

/// Type equality that also accepts the `[]` placeholder: a list of `None`
/// on the left equals any list on the right, at any nesting depth.
pub fn equal_types(left: &Type, right: &Type) -> bool {
    match (left, right) {
        (Type::List(left), Type::List(right)) => **left == Type::None || equal_types(left, right),
        (Type::Generator(left), Type::Generator(right)) => equal_types(left, right),
        _ => left == right,
    }
}

/// Whether a value of type `value` may be stored where `target` is expected.
pub fn is_assignable(value: &Type, target: &Type) -> bool {
    if equal_types(value, target) {
        return true;
    }

    match (value, target) {
        (Type::None, Type::Class { .. } | Type::List(_) | Type::Generator(_)) => true,
        (Type::Generator(_), Type::Class { name, .. }) => name == "generator",
        (Type::Generator(value), Type::Generator(target)) => is_assignable(value, target),
        _ => false,
    }
}

/// Per-body state: local variables and return tracking.
#[derive(Debug, Clone)]
pub struct LocalTypeEnv {
    pub vars: HashMap<String, Type>,
    pub expected_ret: Type,
    /// What the statements seen so far return; `Either` when branches disagree.
    pub actual_ret: Type,
    pub top_level: bool,
    pub loop_depth: usize,
    /// Innermost last. Maps a comprehension item to its fresh name and type.
    pub comprehension_scopes: Vec<HashMap<String, (String, Type)>>,
}

impl LocalTypeEnv {
    pub fn top_level() -> Self {
        LocalTypeEnv {
            vars: HashMap::new(),
            expected_ret: Type::None,
            actual_ret: Type::None,
            top_level: true,
            loop_depth: 0,
            comprehension_scopes: vec![],
        }
    }

    pub fn function(expected_ret: Type) -> Self {
        LocalTypeEnv {
            expected_ret,
            top_level: false,
            ..LocalTypeEnv::top_level()
        }
    }

    /// Resolves a comprehension item, innermost scope first.
    pub fn comprehension_var(&self, name: &str) -> Option<&(String, Type)> {
        self.comprehension_scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }
}
