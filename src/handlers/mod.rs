pub mod live;
pub mod matches;
pub mod players;
pub mod season;
pub mod teams;
