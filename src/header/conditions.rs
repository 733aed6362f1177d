use super::DefineTable;

/// Evaluate an `#if`/`#elif` expression.
///
/// Only the forms configuration headers actually use are understood; anything
/// else is treated as true so that definitions behind it stay visible.
pub(super) fn eval_condition(expr: &str, table: &DefineTable) -> bool {
    let expr = expr.trim();
    match expr {
        "0" | "false" => return false,
        "1" | "true" => return true,
        _ => {}
    }

    if let Some(inner) = expr.strip_prefix('!') {
        let inner = inner.trim();
        if let Some(args) = call_args(inner, "defined") {
            return !args.iter().all(|a| table.is_defined(a));
        }
    }

    if let Some(args) = call_args(expr, "defined") {
        return args.iter().all(|a| table.is_defined(a));
    }
    if let Some(args) = call_args(expr, "ENABLED")
        .or_else(|| call_args(expr, "BOTH"))
        .or_else(|| call_args(expr, "ALL"))
    {
        return args.iter().all(|a| table.is_enabled(a));
    }
    if let Some(args) = call_args(expr, "DISABLED").or_else(|| call_args(expr, "NONE")) {
        return args.iter().all(|a| !table.is_enabled(a));
    }
    if let Some(args) = call_args(expr, "ANY") {
        return args.iter().any(|a| table.is_enabled(a));
    }

    log::debug!("unrecognised condition `{}`, treating as active", expr);
    true
}

/// Arguments of a single `NAME(a, b, ...)` call spanning the whole expression.
fn call_args<'a>(expr: &'a str, func: &str) -> Option<Vec<&'a str>> {
    let rest = expr.strip_prefix(func)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    if inner.contains('(') || inner.contains(')') {
        return None;
    }
    let args: Vec<&str> = inner
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    if args.is_empty() { None } else { Some(args) }
}
