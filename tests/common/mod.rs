#![allow(dead_code)]

use reviewsm::ReviewStore;

pub const REVIEWS_CSV: &str = "\
date_Date Created,string_City,string_State,string_Place Location,summary,Text
2024-01-15,Springfield,IL,123 Main St,Friendly staff in Springfield.,The staff were friendly!
2024-02-20T09:30:00,Toronto,,23 Main St,Long wait in Toronto.,Waited forever.
2024-03-05,Chicago,IL,456 Oak Ave,Great selection in Chicago.,Great selection.
2024-03-31 18:00,Springfield,MO,1200 Main Street,Mixed feelings in Springfield MO.,It was ok
";

pub const SPRINGFIELD_IL: &str = "Friendly staff in Springfield.";
pub const TORONTO: &str = "Long wait in Toronto.";
pub const CHICAGO: &str = "Great selection in Chicago.";
pub const SPRINGFIELD_MO: &str = "Mixed feelings in Springfield MO.";

pub fn store() -> ReviewStore {
    ReviewStore::from_reader(REVIEWS_CSV.as_bytes()).expect("fixture CSV should load")
}
