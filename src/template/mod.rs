//! Template scanning for provisioning documents
//!
//! A template is plain text carrying three kinds of markers:
//!
//! ```text
//! <User>{$account.1.user_id}</User>
//! <EnableReg>{if isset($account.1.password)}1{else}0{/if}</EnableReg>
//! {if $account.1.sip_transport == 'tls'}<Transport>2</Transport>{/if}
//! <!-- Second account starts here -->
//! ...
//! <!-- End of second account -->
//! ```
//!
//! Scanning turns the text into an ordered node tree once; the expansion
//! engine then evaluates guards against a device record and splices the
//! pieces back together.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
