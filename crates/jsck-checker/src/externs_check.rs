//! Flags name references inside externs.

use crate::diagnostics::NAME_REFERENCE_IN_EXTERNS_ERROR;
use jsck_binder::{Callback, NodeTraversal};
use jsck_parser::{NodeIndex, NodeKind};
use std::convert::Infallible;

/// Reports every `Name` in the externs that is not a declaration, a
/// function name, a property access receiver or a parameter. Externs are
/// never executed, so such references have no effect.
pub struct NameRefInExternsCheck;

impl Callback for NameRefInExternsCheck {
    type Error = Infallible;

    fn visit(
        &mut self,
        t: &mut NodeTraversal<'_>,
        n: NodeIndex,
        parent: NodeIndex,
    ) -> Result<(), Infallible> {
        if t.arena().kind(n) != Some(NodeKind::Name) {
            return Ok(());
        }

        match t.arena().kind(parent) {
            Some(NodeKind::Var | NodeKind::Function | NodeKind::GetProp | NodeKind::ParamList) => {}
            _ => {
                let name = t.arena().text(n).to_string();
                t.report(n, &NAME_REFERENCE_IN_EXTERNS_ERROR, &[&name]);
            }
        }
        Ok(())
    }
}
