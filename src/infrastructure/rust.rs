//! Rust source producer.
//!
//! Parses a file with syn and maps the syntax onto [`TreeNode`]s. The kind
//! is the construct name (`Fn`, `Let`, `Binary`, ...) and the value the
//! identifier, operator or literal the construct carries. Constructs without
//! a dedicated mapping become `Item`, `Expr`, `Pat` or `Type` with an empty
//! value.

use crate::domain::tree::TreeNode;
use crate::error::ProduceError;
use crate::ports::TreeProducer;
use syn::punctuated::Punctuated;
use syn::{
    BinOp, Block, Expr, Fields, FnArg, GenericArgument, ImplItem, Item, Lit, Member, Pat, Path,
    PathArguments, RangeLimits, ReturnType, Signature, Stmt, TraitItem, Type, UnOp, UseTree,
};

pub struct RustProducer {
    src: String,
}

impl RustProducer {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl TreeProducer for RustProducer {
    fn produce(&self) -> Result<TreeNode, ProduceError> {
        let file = syn::parse_file(&self.src)?;
        let mut root = TreeNode::leaf("File");
        for item in &file.items {
            root.push_child(item_node(item));
        }
        tracing::debug!(items = file.items.len(), nodes = root.node_count(), "parsed Rust source");
        Ok(root)
    }
}

fn item_node(item: &Item) -> TreeNode {
    match item {
        Item::Fn(f) => fn_node(&f.sig, Some(&*f.block)),
        Item::Struct(s) => {
            let mut node = TreeNode::new("Struct", s.ident.to_string());
            push_fields(&mut node, &s.fields);
            node
        }
        Item::Enum(e) => {
            let mut node = TreeNode::new("Enum", e.ident.to_string());
            for variant in &e.variants {
                let mut v = TreeNode::new("Variant", variant.ident.to_string());
                push_fields(&mut v, &variant.fields);
                if let Some((_, discriminant)) = &variant.discriminant {
                    v.push_child(expr_node(discriminant));
                }
                node.push_child(v);
            }
            node
        }
        Item::Mod(m) => {
            let mut node = TreeNode::new("Mod", m.ident.to_string());
            if let Some((_, items)) = &m.content {
                for item in items {
                    node.push_child(item_node(item));
                }
            }
            node
        }
        Item::Use(u) => TreeNode::new("Use", use_text(&u.tree)),
        Item::Const(c) => TreeNode::new("Const", c.ident.to_string())
            .with_child(type_node(&c.ty))
            .with_child(expr_node(&c.expr)),
        Item::Static(s) => TreeNode::new("Static", s.ident.to_string())
            .with_child(type_node(&s.ty))
            .with_child(expr_node(&s.expr)),
        Item::Type(t) => TreeNode::new("TypeAlias", t.ident.to_string()).with_child(type_node(&t.ty)),
        Item::Impl(i) => {
            let mut node = TreeNode::new("Impl", type_text(&i.self_ty));
            if let Some((_, path, _)) = &i.trait_ {
                node.push_child(TreeNode::new("Trait", path_text(path)));
            }
            for item in &i.items {
                node.push_child(match item {
                    ImplItem::Fn(f) => fn_node(&f.sig, Some(&f.block)),
                    ImplItem::Const(c) => TreeNode::new("Const", c.ident.to_string())
                        .with_child(type_node(&c.ty))
                        .with_child(expr_node(&c.expr)),
                    ImplItem::Type(t) => {
                        TreeNode::new("TypeAlias", t.ident.to_string()).with_child(type_node(&t.ty))
                    }
                    _ => TreeNode::leaf("Item"),
                });
            }
            node
        }
        Item::Trait(t) => {
            let mut node = TreeNode::new("Trait", t.ident.to_string());
            for item in &t.items {
                node.push_child(match item {
                    TraitItem::Fn(f) => fn_node(&f.sig, f.default.as_ref()),
                    TraitItem::Const(c) => {
                        TreeNode::new("Const", c.ident.to_string()).with_child(type_node(&c.ty))
                    }
                    TraitItem::Type(t) => TreeNode::new("TypeAlias", t.ident.to_string()),
                    _ => TreeNode::leaf("Item"),
                });
            }
            node
        }
        Item::Macro(m) => TreeNode::new("Macro", path_text(&m.mac.path)),
        _ => TreeNode::leaf("Item"),
    }
}

fn fn_node(sig: &Signature, body: Option<&Block>) -> TreeNode {
    let mut node = TreeNode::new("Fn", sig.ident.to_string());
    for input in &sig.inputs {
        node.push_child(match input {
            FnArg::Receiver(r) => {
                let text = match (&r.reference, r.mutability.is_some()) {
                    (Some(_), true) => "&mut self",
                    (Some(_), false) => "&self",
                    (None, true) => "mut self",
                    (None, false) => "self",
                };
                TreeNode::new("SelfParam", text)
            }
            FnArg::Typed(p) => {
                TreeNode::new("Param", pat_text(&p.pat)).with_child(type_node(&p.ty))
            }
        });
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        node.push_child(TreeNode::leaf("Return").with_child(type_node(ty)));
    }
    if let Some(block) = body {
        node.push_child(block_node(block));
    }
    node
}

fn push_fields(node: &mut TreeNode, fields: &Fields) {
    for (index, field) in fields.iter().enumerate() {
        let name = field
            .ident
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_else(|| index.to_string());
        node.push_child(TreeNode::new("Field", name).with_child(type_node(&field.ty)));
    }
}

fn block_node(block: &Block) -> TreeNode {
    let mut node = TreeNode::leaf("Block");
    for stmt in &block.stmts {
        node.push_child(stmt_node(stmt));
    }
    node
}

fn stmt_node(stmt: &Stmt) -> TreeNode {
    match stmt {
        Stmt::Local(local) => {
            let mut node = TreeNode::new("Let", pat_text(&local.pat));
            if let Pat::Type(p) = &local.pat {
                node.push_child(type_node(&p.ty));
            }
            if let Some(init) = &local.init {
                node.push_child(expr_node(&init.expr));
                if let Some((_, diverge)) = &init.diverge {
                    node.push_child(TreeNode::leaf("Else").with_child(expr_node(diverge)));
                }
            }
            node
        }
        Stmt::Item(item) => item_node(item),
        Stmt::Expr(expr, _) => expr_node(expr),
        Stmt::Macro(m) => TreeNode::new("Macro", path_text(&m.mac.path)),
    }
}

fn exprs_into<'a>(node: &mut TreeNode, exprs: impl IntoIterator<Item = &'a Expr>) {
    for expr in exprs {
        node.push_child(expr_node(expr));
    }
}

fn expr_node(expr: &Expr) -> TreeNode {
    match expr {
        Expr::Lit(l) => TreeNode::new("Lit", lit_text(&l.lit)),
        Expr::Path(p) => TreeNode::new("Path", path_text(&p.path)),
        Expr::Binary(b) => TreeNode::new("Binary", bin_op_text(&b.op))
            .with_child(expr_node(&b.left))
            .with_child(expr_node(&b.right)),
        Expr::Unary(u) => {
            let op = match u.op {
                UnOp::Deref(_) => "*",
                UnOp::Not(_) => "!",
                UnOp::Neg(_) => "-",
                _ => "",
            };
            TreeNode::new("Unary", op).with_child(expr_node(&u.expr))
        }
        Expr::Call(c) => {
            let mut node = TreeNode::leaf("Call").with_child(expr_node(&c.func));
            exprs_into(&mut node, &c.args);
            node
        }
        Expr::MethodCall(m) => {
            let mut node =
                TreeNode::new("MethodCall", m.method.to_string()).with_child(expr_node(&m.receiver));
            exprs_into(&mut node, &m.args);
            node
        }
        Expr::Field(f) => TreeNode::new("Field", member_text(&f.member)).with_child(expr_node(&f.base)),
        Expr::Index(i) => TreeNode::leaf("Index")
            .with_child(expr_node(&i.expr))
            .with_child(expr_node(&i.index)),
        Expr::If(i) => {
            let mut node = TreeNode::leaf("If")
                .with_child(expr_node(&i.cond))
                .with_child(block_node(&i.then_branch));
            if let Some((_, else_branch)) = &i.else_branch {
                node.push_child(TreeNode::leaf("Else").with_child(expr_node(else_branch)));
            }
            node
        }
        Expr::While(w) => TreeNode::leaf("While")
            .with_child(expr_node(&w.cond))
            .with_child(block_node(&w.body)),
        Expr::ForLoop(f) => TreeNode::new("For", pat_text(&f.pat))
            .with_child(expr_node(&f.expr))
            .with_child(block_node(&f.body)),
        Expr::Loop(l) => TreeNode::leaf("Loop").with_child(block_node(&l.body)),
        Expr::Block(b) => block_node(&b.block),
        Expr::Unsafe(u) => TreeNode::leaf("Unsafe").with_child(block_node(&u.block)),
        Expr::Return(r) => {
            let mut node = TreeNode::leaf("Return");
            exprs_into(&mut node, r.expr.as_deref());
            node
        }
        Expr::Break(b) => {
            let mut node = TreeNode::leaf("Break");
            exprs_into(&mut node, b.expr.as_deref());
            node
        }
        Expr::Continue(_) => TreeNode::leaf("Continue"),
        Expr::Assign(a) => TreeNode::leaf("Assign")
            .with_child(expr_node(&a.left))
            .with_child(expr_node(&a.right)),
        Expr::Paren(p) => expr_node(&p.expr),
        Expr::Reference(r) => {
            let op = if r.mutability.is_some() { "&mut" } else { "&" };
            TreeNode::new("Ref", op).with_child(expr_node(&r.expr))
        }
        Expr::Match(m) => {
            let mut node = TreeNode::leaf("Match").with_child(expr_node(&m.expr));
            for arm in &m.arms {
                let mut a = TreeNode::new("Arm", pat_text(&arm.pat));
                if let Some((_, guard)) = &arm.guard {
                    a.push_child(TreeNode::leaf("Guard").with_child(expr_node(guard)));
                }
                a.push_child(expr_node(&arm.body));
                node.push_child(a);
            }
            node
        }
        Expr::Closure(c) => {
            let mut node = TreeNode::leaf("Closure");
            for input in &c.inputs {
                node.push_child(TreeNode::new("Param", pat_text(input)));
            }
            node.with_child(expr_node(&c.body))
        }
        Expr::Tuple(t) => {
            let mut node = TreeNode::leaf("Tuple");
            exprs_into(&mut node, &t.elems);
            node
        }
        Expr::Array(a) => {
            let mut node = TreeNode::leaf("Array");
            exprs_into(&mut node, &a.elems);
            node
        }
        Expr::Struct(s) => {
            let mut node = TreeNode::new("StructLit", path_text(&s.path));
            for field in &s.fields {
                node.push_child(
                    TreeNode::new("FieldValue", member_text(&field.member)).with_child(expr_node(&field.expr)),
                );
            }
            node
        }
        Expr::Range(r) => {
            let op = match r.limits {
                RangeLimits::HalfOpen(_) => "..",
                RangeLimits::Closed(_) => "..=",
            };
            let mut node = TreeNode::new("Range", op);
            exprs_into(&mut node, r.start.as_deref());
            exprs_into(&mut node, r.end.as_deref());
            node
        }
        Expr::Cast(c) => TreeNode::new("Cast", type_text(&c.ty)).with_child(expr_node(&c.expr)),
        Expr::Try(t) => TreeNode::new("Try", "?").with_child(expr_node(&t.expr)),
        Expr::Await(a) => TreeNode::leaf("Await").with_child(expr_node(&a.base)),
        Expr::Let(l) => TreeNode::new("LetCond", pat_text(&l.pat)).with_child(expr_node(&l.expr)),
        Expr::Macro(m) => TreeNode::new("Macro", path_text(&m.mac.path)),
        _ => TreeNode::leaf("Expr"),
    }
}

fn type_node(ty: &Type) -> TreeNode {
    TreeNode::new("Type", type_text(ty))
}

fn lit_text(lit: &Lit) -> String {
    match lit {
        Lit::Str(s) => s.value(),
        Lit::ByteStr(b) => String::from_utf8_lossy(&b.value()).into_owned(),
        Lit::Byte(b) => b.value().to_string(),
        Lit::Char(c) => c.value().to_string(),
        Lit::Int(i) => i.base10_digits().to_string(),
        Lit::Float(f) => f.base10_digits().to_string(),
        Lit::Bool(b) => b.value.to_string(),
        Lit::Verbatim(v) => v.to_string(),
        _ => String::new(),
    }
}

fn bin_op_text(op: &BinOp) -> &'static str {
    match op {
        BinOp::Add(_) => "+",
        BinOp::Sub(_) => "-",
        BinOp::Mul(_) => "*",
        BinOp::Div(_) => "/",
        BinOp::Rem(_) => "%",
        BinOp::And(_) => "&&",
        BinOp::Or(_) => "||",
        BinOp::BitXor(_) => "^",
        BinOp::BitAnd(_) => "&",
        BinOp::BitOr(_) => "|",
        BinOp::Shl(_) => "<<",
        BinOp::Shr(_) => ">>",
        BinOp::Eq(_) => "==",
        BinOp::Lt(_) => "<",
        BinOp::Le(_) => "<=",
        BinOp::Ne(_) => "!=",
        BinOp::Ge(_) => ">=",
        BinOp::Gt(_) => ">",
        BinOp::AddAssign(_) => "+=",
        BinOp::SubAssign(_) => "-=",
        BinOp::MulAssign(_) => "*=",
        BinOp::DivAssign(_) => "/=",
        BinOp::RemAssign(_) => "%=",
        BinOp::BitXorAssign(_) => "^=",
        BinOp::BitAndAssign(_) => "&=",
        BinOp::BitOrAssign(_) => "|=",
        BinOp::ShlAssign(_) => "<<=",
        BinOp::ShrAssign(_) => ">>=",
        _ => "",
    }
}

fn member_text(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

fn path_text(path: &Path) -> String {
    let mut text = String::new();
    if path.leading_colon.is_some() {
        text.push_str("::");
    }
    for (i, segment) in path.segments.iter().enumerate() {
        if i > 0 {
            text.push_str("::");
        }
        text.push_str(&segment.ident.to_string());
        if let PathArguments::AngleBracketed(args) = &segment.arguments {
            let args: Vec<String> = args
                .args
                .iter()
                .map(|arg| match arg {
                    GenericArgument::Type(ty) => type_text(ty),
                    GenericArgument::Lifetime(lt) => lt.to_string(),
                    _ => "_".to_string(),
                })
                .collect();
            text.push('<');
            text.push_str(&args.join(", "));
            text.push('>');
        }
    }
    text
}

fn join<T>(items: &Punctuated<T, impl Sized>, f: impl Fn(&T) -> String) -> String {
    items.iter().map(f).collect::<Vec<_>>().join(", ")
}

fn type_text(ty: &Type) -> String {
    match ty {
        Type::Path(p) => path_text(&p.path),
        Type::Reference(r) => {
            let mut text = String::from("&");
            if let Some(lt) = &r.lifetime {
                text.push_str(&format!("{} ", lt));
            }
            if r.mutability.is_some() {
                text.push_str("mut ");
            }
            text.push_str(&type_text(&r.elem));
            text
        }
        Type::Ptr(p) => {
            let qualifier = if p.mutability.is_some() { "mut" } else { "const" };
            format!("*{} {}", qualifier, type_text(&p.elem))
        }
        Type::Slice(s) => format!("[{}]", type_text(&s.elem)),
        Type::Array(a) => format!("[{}; _]", type_text(&a.elem)),
        Type::Tuple(t) => format!("({})", join(&t.elems, type_text)),
        Type::Paren(p) => type_text(&p.elem),
        Type::Never(_) => "!".to_string(),
        Type::Infer(_) => "_".to_string(),
        Type::ImplTrait(_) => "impl _".to_string(),
        Type::TraitObject(_) => "dyn _".to_string(),
        _ => "_".to_string(),
    }
}

fn pat_text(pat: &Pat) -> String {
    match pat {
        Pat::Ident(p) => {
            let mut text = String::new();
            if p.by_ref.is_some() {
                text.push_str("ref ");
            }
            if p.mutability.is_some() {
                text.push_str("mut ");
            }
            text.push_str(&p.ident.to_string());
            text
        }
        Pat::Wild(_) => "_".to_string(),
        Pat::Rest(_) => "..".to_string(),
        Pat::Lit(l) => lit_text(&l.lit),
        Pat::Path(p) => path_text(&p.path),
        Pat::Type(p) => pat_text(&p.pat),
        Pat::Paren(p) => pat_text(&p.pat),
        Pat::Reference(r) => {
            let prefix = if r.mutability.is_some() { "&mut " } else { "&" };
            format!("{}{}", prefix, pat_text(&r.pat))
        }
        Pat::Tuple(t) => format!("({})", join(&t.elems, pat_text)),
        Pat::TupleStruct(t) => format!("{}({})", path_text(&t.path), join(&t.elems, pat_text)),
        Pat::Slice(s) => format!("[{}]", join(&s.elems, pat_text)),
        Pat::Struct(s) => format!("{} {{ .. }}", path_text(&s.path)),
        Pat::Or(o) => o.cases.iter().map(pat_text).collect::<Vec<_>>().join(" | "),
        _ => "_".to_string(),
    }
}

fn use_text(tree: &UseTree) -> String {
    match tree {
        UseTree::Path(p) => format!("{}::{}", p.ident, use_text(&p.tree)),
        UseTree::Name(n) => n.ident.to_string(),
        UseTree::Rename(r) => format!("{} as {}", r.ident, r.rename),
        UseTree::Glob(_) => "*".to_string(),
        UseTree::Group(g) => format!("{{{}}}", join(&g.items, use_text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produce(src: &str) -> TreeNode {
        RustProducer::new(src).produce().unwrap()
    }

    fn kinds(node: &TreeNode) -> Vec<&str> {
        node.children().iter().map(|c| c.kind()).collect()
    }

    #[test]
    fn test_function_with_params_and_body() {
        let root = produce("fn add(a: i32, b: &mut Vec<u8>) -> i32 { let x = a + 1; x }");
        assert_eq!(root.kind(), "File");
        let f = &root.children()[0];
        assert_eq!((f.kind(), f.value()), ("Fn", "add"));
        assert_eq!(kinds(f), vec!["Param", "Param", "Return", "Block"]);
        assert_eq!(f.children()[1].children()[0].value(), "&mut Vec<u8>");

        let block = &f.children()[3];
        let let_stmt = &block.children()[0];
        assert_eq!((let_stmt.kind(), let_stmt.value()), ("Let", "x"));
        let sum = &let_stmt.children()[0];
        assert_eq!((sum.kind(), sum.value()), ("Binary", "+"));
        assert_eq!(sum.children()[1].value(), "1");
        assert_eq!(block.children()[1].label(), "Path x");
    }

    #[test]
    fn test_items() {
        let root = produce(
            r#"
            use std::{io, fmt::Write as _};
            struct Point { x: f64, y: f64 }
            enum Shape { Dot(Point), Empty }
            impl Shape { fn area(&self) -> f64 { 0.0 } }
            "#,
        );
        assert_eq!(kinds(&root), vec!["Use", "Struct", "Enum", "Impl"]);
        assert_eq!(root.children()[0].value(), "std::{io, fmt::Write as _}");
        assert_eq!(kinds(&root.children()[1]), vec!["Field", "Field"]);
        assert_eq!(root.children()[2].children()[0].children()[0].label(), "Field 0");
        let method = &root.children()[3].children()[0];
        assert_eq!(method.children()[0].label(), "SelfParam &self");
    }

    #[test]
    fn test_method_calls_and_control_flow() {
        let root = produce(
            r#"fn main() { if let Some(v) = opt { v.len(); } else { println!("none"); } }"#,
        );
        let body = &root.children()[0].children()[0];
        let if_expr = &body.children()[0];
        assert_eq!(kinds(if_expr), vec!["LetCond", "Block", "Else"]);
        assert_eq!(if_expr.children()[0].value(), "Some(v)");
        let call = &if_expr.children()[1].children()[0];
        assert_eq!((call.kind(), call.value()), ("MethodCall", "len"));
    }

    #[test]
    fn test_invalid_source_fails() {
        let err = RustProducer::new("fn (").produce().unwrap_err();
        assert!(matches!(err, ProduceError::Rust(_)));
    }
}
