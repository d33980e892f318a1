//! View routing step definitions

use cucumber::{then, when};

use scriptscan::models::Navigation;

use crate::features::support::TestWorld;

#[when(expr = "the {string} view is requested")]
async fn view_requested(world: &mut TestWorld, requested: String) {
    world.navigation = Some(Navigation::build(&requested, world.profile()));
}

#[then(expr = "the {string} view is shown")]
async fn view_shown(world: &mut TestWorld, expected: String) {
    assert_eq!(world.navigation().view.as_str(), expected);
}

#[then(expr = "the header lists {string}")]
async fn header_lists(world: &mut TestWorld, expected: String) {
    let labels: Vec<&str> = world
        .navigation()
        .items
        .iter()
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(labels.join(", "), expected);
}

#[then(expr = "the {string} header entry is highlighted")]
async fn header_highlighted(world: &mut TestWorld, label: String) {
    let active: Vec<&str> = world
        .navigation()
        .items
        .iter()
        .filter(|item| item.active)
        .map(|item| item.label.as_str())
        .collect();
    assert_eq!(active, vec![label.as_str()]);
}
