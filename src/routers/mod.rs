pub mod root;
pub mod song;
pub use root::health_check_route;
pub use song::{
    add_song_form_route, add_song_route, delete_song_route, edit_song_form_route, edit_song_route,
    list_songs_route, show_song_route,
};
