//! The four static dashboards, one module per PNG.
//!
//! Every module exposes the file name it writes, the figure title, the
//! statistics it derives (public so they can be checked without rendering)
//! and a `render` function drawing the 2x2 figure.

pub mod country;
pub mod genre;
pub mod segments;
pub mod temporal;

fn owned_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    labels.into_iter().map(str::to_owned).collect()
}
