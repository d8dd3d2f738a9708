#[cfg(test)]
mod integration_tests;
