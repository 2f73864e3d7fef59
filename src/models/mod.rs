pub mod movie;
pub mod theater;
pub mod hall;
pub mod show;
pub mod seat;
pub mod booking;

pub use movie::Movie;
pub use theater::Theater;
pub use hall::{Hall, RowLayout};
pub use show::Show;
pub use seat::Seat;
pub use booking::Booking;
