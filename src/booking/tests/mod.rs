mod common;
mod pricing;
mod quote;
