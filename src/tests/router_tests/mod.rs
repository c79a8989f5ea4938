mod bikes_tests;
mod export_tests;
mod fetch_tests;
