mod export_tests;
mod geometry_tests;
mod render_tests;
