//! Integration tests of the deploy console

mod test_actions;
mod test_http;
