mod common;

mod candidates;
mod load;
mod round_trip;
mod try_play;
