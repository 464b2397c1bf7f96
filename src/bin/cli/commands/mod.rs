pub mod cards;
pub mod dashboard;
pub mod edit;
pub mod files;
pub mod links;
pub mod modules;
pub mod pomodoro;
pub mod review;
pub mod show;
pub mod timeline;
