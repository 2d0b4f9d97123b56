//! Page rendering.
//!
//! Handlers hand a [`View`] to whatever [`ViewRenderer`] the app was built
//! with; [`HtmlViews`] is the stock one.

use std::fmt::Write;

use crate::models::song::Song;

/// Data for one page.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Index { songs: &'a [Song] },
    Song { song: Option<&'a Song> },
    AddSong,
    EditSong { song: &'a Song },
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: View<'_>) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct HtmlViews;

impl ViewRenderer for HtmlViews {
    fn render(&self, view: View<'_>) -> String {
        match view {
            View::Index { songs } => layout("Songs", &index(songs)),
            View::Song { song: Some(song) } => layout(text(&song.name), &detail(song)),
            View::Song { song: None } => layout(
                "Song not found",
                "<h1>Song not found</h1>\n<p><a href=\"/\">Back to all songs</a></p>",
            ),
            View::AddSong => layout("Add song", &song_form("/addSong", "Add song", None)),
            View::EditSong { song } => layout(
                "Edit song",
                &song_form(&format!("/editSong/{}", song.id), "Update song", Some(song)),
            ),
        }
    }
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// The stored image name, unless it is missing or blank.
fn image_of(song: &Song) -> Option<&str> {
    song.image.as_deref().filter(|image| !image.is_empty())
}

fn image_src(image: &str) -> String {
    format!("/images/{}", urlencoding::encode(image))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn index(songs: &[Song]) -> String {
    let mut html = String::from("<h1>Songs</h1>\n<p><a href=\"/addSong\">Add a song</a></p>\n");
    if songs.is_empty() {
        html.push_str("<p>No songs yet.</p>");
        return html;
    }

    html.push_str(
        "<table>\n<thead><tr><th>Image</th><th>Name</th><th>Artist</th><th>Album</th><th></th></tr></thead>\n<tbody>\n",
    );
    for song in songs {
        let image = match image_of(song) {
            Some(image) => format!(
                "<img src=\"{}\" alt=\"{}\" width=\"64\">",
                escape_html(&image_src(image)),
                escape_html(text(&song.name))
            ),
            None => String::new(),
        };
        let _ = writeln!(
            html,
            "<tr><td>{image}</td><td><a href=\"/song/{id}\">{name}</a></td><td>{artist}</td><td>{album}</td>\
             <td><a href=\"/editSong/{id}\">Edit</a> <a href=\"/deleteSong/{id}\">Delete</a></td></tr>",
            id = song.id,
            name = escape_html(text(&song.name)),
            artist = escape_html(text(&song.artist)),
            album = escape_html(text(&song.album)),
        );
    }
    html.push_str("</tbody>\n</table>");
    html
}

fn detail(song: &Song) -> String {
    let mut html = format!(
        "<h1>{}</h1>\n<p>Artist: {}</p>\n<p>Album: {}</p>\n",
        escape_html(text(&song.name)),
        escape_html(text(&song.artist)),
        escape_html(text(&song.album)),
    );
    if let Some(image) = image_of(song) {
        let _ = writeln!(
            html,
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&image_src(image)),
            escape_html(text(&song.name))
        );
    }
    let _ = write!(
        html,
        "<h2>Lyrics</h2>\n<pre>{}</pre>\n<h2>Meaning</h2>\n<pre>{}</pre>\n\
         <p><a href=\"/editSong/{id}\">Edit</a> <a href=\"/deleteSong/{id}\">Delete</a> <a href=\"/\">Back</a></p>",
        escape_html(text(&song.lyrics)),
        escape_html(text(&song.meaning)),
        id = song.id,
    );
    html
}

fn song_form(action: &str, submit: &str, song: Option<&Song>) -> String {
    let value = |field: fn(&Song) -> &Option<String>| {
        song.map(|s| escape_html(text(field(s)))).unwrap_or_default()
    };

    let mut html = format!(
        "<h1>{submit}</h1>\n<form action=\"{action}\" method=\"POST\" enctype=\"multipart/form-data\">\n\
         <label>Name <input type=\"text\" name=\"name\" value=\"{name}\" required></label>\n\
         <label>Artist <input type=\"text\" name=\"artist\" value=\"{artist}\"></label>\n\
         <label>Album <input type=\"text\" name=\"album\" value=\"{album}\"></label>\n\
         <label>Lyrics <textarea name=\"lyrics\">{lyrics}</textarea></label>\n\
         <label>Meaning <textarea name=\"meaning\">{meaning}</textarea></label>\n",
        submit = escape_html(submit),
        action = escape_html(action),
        name = value(|s| &s.name),
        artist = value(|s| &s.artist),
        album = value(|s| &s.album),
        lyrics = value(|s| &s.lyrics),
        meaning = value(|s| &s.meaning),
    );

    // No hidden field without an image, so resubmitting keeps it NULL.
    if let Some(image) = song.and_then(image_of) {
        let _ = writeln!(
            html,
            "<p>Current image: <img src=\"{}\" alt=\"\" width=\"64\"></p>\n\
             <input type=\"hidden\" name=\"currentImage\" value=\"{}\">",
            escape_html(&image_src(image)),
            escape_html(image)
        );
    }

    let _ = write!(
        html,
        "<label>Image <input type=\"file\" name=\"image\" accept=\"image/*\"></label>\n\
         <button type=\"submit\">{}</button>\n</form>\n<p><a href=\"/\">Back</a></p>",
        escape_html(submit)
    );
    html
}
