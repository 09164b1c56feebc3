//! Wire types shared between the manual client and the CGI API.
//!
//! Every struct here mirrors a JSON body produced or consumed by one of the
//! `cgi-bin/api` scripts. The types carry no behavior beyond serde.

pub mod domain;
pub mod shared;
pub mod system;
