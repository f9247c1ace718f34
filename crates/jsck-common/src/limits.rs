//! Limits that keep recursive front-end and pass code off the end of the
//! stack.

/// Maximum syntactic nesting the parser accepts.
///
/// Every nested statement, expression, unary operator and link of a
/// member, call or binary chain counts one level. The tree the parser builds
/// is therefore at most a small multiple of this deep, which bounds the
/// recursion of every later traversal.
///
/// ```javascript
/// var x = ((((((((((((1))))))))))));   // 12 levels
/// a.b.c.d.e;                          // 4 chain links
/// if (a) { if (b) { if (c) {} } }     // 6 statement levels
/// ```
pub const MAX_NESTING_DEPTH: u32 = 256;
