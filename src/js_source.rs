//! Static evaluation of `tailwind.config.{js,cjs,mjs,ts}` files.
//!
//! The exported value must be a declarative literal: objects, arrays, strings,
//! numbers, booleans and `null`, optionally routed through top-level `const`
//! bindings. `require('pkg')` and `require('pkg')(options)` stand for plugin
//! references, as do default and namespace ESM imports. Top-level statements
//! other than declarations and the export itself are rejected, since they could
//! change the exported value at runtime. Nothing is executed.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::sync::Arc;
use swc_core::common::{FileName, Globals, SourceMap, Span, Spanned, GLOBALS};
use swc_core::ecma::ast::*;
use swc_core::ecma::parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};
use tracing::trace;

use crate::config::SourceFormat;
use crate::errors::{ManifestError, Result};

/// Binding chains deeper than this are treated as cycles
const MAX_DEPTH: usize = 64;

/// Parse `source` and evaluate its exported configuration object to JSON
pub fn evaluate(source: &str, source_name: &str, format: SourceFormat) -> Result<Value> {
    let source_map = Arc::new(SourceMap::default());
    let source_file = source_map.new_source_file(
        FileName::Custom(source_name.to_string()).into(),
        source.to_string(),
    );

    let syntax = match format {
        SourceFormat::TypeScript => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: false,
            dts: false,
            no_early_errors: true,
            disallow_ambiguous_jsx_like: false,
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: false,
            decorators: false,
            decorators_before_export: false,
            export_default_from: false,
            import_attributes: false,
            allow_super_outside_method: false,
            allow_return_outside_function: false,
            auto_accessors: false,
            explicit_resource_management: false,
            fn_bind: false,
        }),
    };

    let module = GLOBALS.set(&Globals::new(), || {
        parse_file_as_module(&source_file, syntax, EsVersion::latest(), None, &mut vec![]).map_err(|e| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            ManifestError::malformed(
                source_name,
                format!("line {}: syntax error: {:?}", loc.line, e.kind()),
            )
        })
    })?;

    let evaluator = Evaluator::new(&module, source_name, &source_map);
    evaluator.check_statements(&module)?;
    let exported = exported_expr(&module)
        .ok_or_else(|| ManifestError::malformed(source_name, "no exported configuration (expected `module.exports =` or `export default`)"))?;

    evaluator.eval(exported, 0)
}

/// The last `module.exports = ...` or `export default ...` in the module
fn exported_expr(module: &Module) -> Option<&Expr> {
    let mut exported = None;
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                exported = Some(&*export.expr);
            }
            ModuleItem::Stmt(Stmt::Expr(stmt)) => {
                if let Expr::Assign(assign) = &*stmt.expr {
                    if assign.op == AssignOp::Assign && is_module_exports(&assign.left) {
                        exported = Some(&*assign.right);
                    }
                }
            }
            _ => {}
        }
    }
    exported
}

fn is_module_exports(target: &AssignTarget) -> bool {
    match target {
        AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
            matches!(&*member.obj, Expr::Ident(obj) if &*obj.sym == "module")
                && matches!(&member.prop, MemberProp::Ident(prop) if &*prop.sym == "exports")
        }
        _ => false,
    }
}

struct Evaluator<'a> {
    source_name: &'a str,
    source_map: &'a SourceMap,
    /// Top-level `const`/`let`/`var` initializers by name
    bindings: HashMap<String, &'a Expr>,
    /// Default and namespace imports: local name → module specifier
    imports: HashMap<String, String>,
}

impl<'a> Evaluator<'a> {
    fn new(module: &'a Module, source_name: &'a str, source_map: &'a SourceMap) -> Self {
        let mut bindings = HashMap::new();
        let mut imports = HashMap::new();
        for item in &module.body {
            let decl = match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) if !import.type_only => {
                    for specifier in &import.specifiers {
                        let local = match specifier {
                            ImportSpecifier::Default(default) => &default.local,
                            ImportSpecifier::Namespace(namespace) => &namespace.local,
                            ImportSpecifier::Named(_) => continue,
                        };
                        imports.insert(local.sym.to_string(), import.src.value.to_string());
                    }
                    continue;
                }
                ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl { decl: Decl::Var(var), .. })) => var,
                _ => continue,
            };
            for declarator in &decl.decls {
                if let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init) {
                    bindings.insert(binding.id.sym.to_string(), &**init);
                }
            }
        }

        trace!(
            bindings = bindings.len(),
            imports = imports.len(),
            "collected top-level bindings"
        );
        Self {
            source_name,
            source_map,
            bindings,
            imports,
        }
    }

    /// Reject top-level statements that could mutate a binding or the export
    fn check_statements(&self, module: &Module) -> Result<()> {
        for item in &module.body {
            let ModuleItem::Stmt(stmt) = item else {
                continue;
            };
            match stmt {
                Stmt::Decl(_) | Stmt::Empty(_) => {}
                Stmt::Expr(ExprStmt { expr, .. }) => match &**expr {
                    Expr::Assign(assign) if assign.op == AssignOp::Assign && is_module_exports(&assign.left) => {}
                    // Directive prologue, e.g. 'use strict'
                    Expr::Lit(Lit::Str(_)) => {}
                    Expr::Assign(assign) => {
                        return Err(self.unsupported(assign.span, "assignment other than `module.exports =`"));
                    }
                    Expr::Update(update) => return Err(self.unsupported(update.span, "update expression")),
                    Expr::Call(call) => return Err(self.unsupported(call.span, "top-level function call")),
                    other => return Err(self.unsupported(other.span(), "top-level expression")),
                },
                other => return Err(self.unsupported(other.span(), "top-level statement")),
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.unsupported(expr.span(), "deeply nested or cyclic binding"));
        }

        match expr {
            Expr::Paren(paren) => self.eval(&paren.expr, depth + 1),
            Expr::TsAs(cast) => self.eval(&cast.expr, depth + 1),
            Expr::TsSatisfies(satisfies) => self.eval(&satisfies.expr, depth + 1),
            Expr::TsConstAssertion(assertion) => self.eval(&assertion.expr, depth + 1),
            Expr::Lit(lit) => self.eval_lit(lit),
            Expr::Tpl(tpl) => {
                if !tpl.exprs.is_empty() {
                    return Err(self.unsupported(tpl.span, "template literal with substitutions"));
                }
                let mut text = String::new();
                for quasi in &tpl.quasis {
                    match &quasi.cooked {
                        Some(cooked) => text.push_str(&cooked.to_string()),
                        None => return Err(self.unsupported(quasi.span, "template literal with an invalid escape")),
                    }
                }
                Ok(Value::String(text))
            }
            Expr::Unary(unary) if unary.op == UnaryOp::Minus => match self.eval(&unary.arg, depth + 1)? {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Ok(Value::from(-i)),
                    None => self.number(n.as_f64().map(|f| -f).unwrap_or(f64::NAN), unary.span),
                },
                _ => Err(self.unsupported(unary.span, "negation of a non-number")),
            },
            Expr::Array(array) => self.eval_array(array, depth),
            Expr::Object(object) => self.eval_object(object, depth),
            Expr::Ident(ident) => self.eval_ident(ident, depth),
            Expr::Call(call) => self.eval_call(call, depth),
            other => Err(self.unsupported(other.span(), describe(other))),
        }
    }

    fn eval_lit(&self, lit: &Lit) -> Result<Value> {
        match lit {
            Lit::Str(s) => Ok(Value::String(s.value.to_string())),
            Lit::Num(n) => self.number(n.value, n.span),
            Lit::Bool(b) => Ok(Value::Bool(b.value)),
            Lit::Null(_) => Ok(Value::Null),
            other => Err(self.unsupported(other.span(), "literal")),
        }
    }

    fn number(&self, value: f64, span: Span) -> Result<Value> {
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            return Ok(Value::from(value as i64));
        }
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or_else(|| self.unsupported(span, "non-finite number"))
    }

    fn eval_ident(&self, ident: &Ident, depth: usize) -> Result<Value> {
        if let Some(init) = self.bindings.get(&*ident.sym) {
            return self.eval(init, depth + 1);
        }
        match self.imports.get(&*ident.sym) {
            Some(module) => Ok(Value::String(module.clone())),
            None => Err(self.unsupported(ident.span, &format!("unbound identifier '{}'", ident.sym))),
        }
    }

    fn eval_array(&self, array: &ArrayLit, depth: usize) -> Result<Value> {
        let mut items = Vec::with_capacity(array.elems.len());
        for elem in &array.elems {
            match elem {
                None => items.push(Value::Null),
                Some(ExprOrSpread { spread: Some(_), expr }) => match self.eval(expr, depth + 1)? {
                    Value::Array(spread) => items.extend(spread),
                    _ => return Err(self.unsupported(expr.span(), "spread of a non-array")),
                },
                Some(ExprOrSpread { expr, .. }) => items.push(self.eval(expr, depth + 1)?),
            }
        }
        Ok(Value::Array(items))
    }

    fn eval_object(&self, object: &ObjectLit, depth: usize) -> Result<Value> {
        let mut map = Map::new();
        for prop in &object.props {
            match prop {
                PropOrSpread::Spread(spread) => match self.eval(&spread.expr, depth + 1)? {
                    Value::Object(entries) => map.extend(entries),
                    _ => return Err(self.unsupported(spread.expr.span(), "spread of a non-object")),
                },
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(kv) => {
                        let key = self.prop_key(&kv.key)?;
                        map.insert(key, self.eval(&kv.value, depth + 1)?);
                    }
                    Prop::Shorthand(ident) => {
                        map.insert(ident.sym.to_string(), self.eval_ident(ident, depth)?);
                    }
                    other => return Err(self.unsupported(other.span(), "method or accessor property")),
                },
            }
        }
        Ok(Value::Object(map))
    }

    fn prop_key(&self, key: &PropName) -> Result<String> {
        match key {
            PropName::Ident(ident) => Ok(ident.sym.to_string()),
            PropName::Str(s) => Ok(s.value.to_string()),
            PropName::Num(n) if n.value.fract() == 0.0 => Ok(format!("{}", n.value as i64)),
            PropName::Num(n) => Ok(n.value.to_string()),
            other => Err(self.unsupported(other.span(), "computed property key")),
        }
    }

    /// `require('pkg')` → `"pkg"`; `factory(options)` → `{ module, options }` where
    /// `factory` is `require('pkg')`, an imported module or a binding to either
    fn eval_call(&self, call: &CallExpr, depth: usize) -> Result<Value> {
        if let Some(module) = self.required_module(call)? {
            return Ok(Value::String(module));
        }

        let factory = match &call.callee {
            Callee::Expr(callee) => self.plugin_factory(callee, depth)?,
            _ => None,
        };

        let Some(module) = factory else {
            return Err(self.unsupported(call.span, "function call"));
        };

        let options = match call.args.as_slice() {
            [] => Value::Null,
            [ExprOrSpread { spread: None, expr }] => self.eval(expr, depth + 1)?,
            _ => return Err(self.unsupported(call.span, "plugin factory call with several arguments")),
        };

        let mut configured = Map::new();
        configured.insert("module".to_string(), Value::String(module));
        if !options.is_null() {
            configured.insert("options".to_string(), options);
        }
        Ok(Value::Object(configured))
    }

    /// Module name behind a callee that refers to a plugin package
    fn plugin_factory(&self, callee: &Expr, depth: usize) -> Result<Option<String>> {
        if depth > MAX_DEPTH {
            return Err(self.unsupported(callee.span(), "deeply nested or cyclic binding"));
        }

        match callee {
            Expr::Paren(paren) => self.plugin_factory(&paren.expr, depth + 1),
            Expr::Call(inner) => self.required_module(inner),
            Expr::Ident(ident) => match self.bindings.get(&*ident.sym) {
                Some(init) => self.plugin_factory(init, depth + 1),
                None => Ok(self.imports.get(&*ident.sym).cloned()),
            },
            _ => Ok(None),
        }
    }

    fn required_module(&self, call: &CallExpr) -> Result<Option<String>> {
        let is_require = matches!(
            &call.callee,
            Callee::Expr(callee) if matches!(&**callee, Expr::Ident(ident) if &*ident.sym == "require")
        );
        if !is_require {
            return Ok(None);
        }

        match call.args.as_slice() {
            [ExprOrSpread { spread: None, expr }] => match &**expr {
                Expr::Lit(Lit::Str(module)) => Ok(Some(module.value.to_string())),
                _ => Err(self.unsupported(call.span, "require() with a non-literal module name")),
            },
            _ => Err(self.unsupported(call.span, "require() without exactly one argument")),
        }
    }

    fn unsupported(&self, span: Span, what: &str) -> ManifestError {
        let loc = self.source_map.lookup_char_pos(span.lo);
        ManifestError::malformed(
            self.source_name,
            format!("line {}: {} cannot be evaluated statically", loc.line, what),
        )
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Fn(_) | Expr::Arrow(_) => "function expression",
        Expr::Member(_) | Expr::OptChain(_) => "member access",
        Expr::Bin(_) => "binary expression",
        Expr::Cond(_) => "conditional expression",
        Expr::New(_) => "constructor call",
        Expr::Await(_) => "await expression",
        _ => "expression",
    }
}
