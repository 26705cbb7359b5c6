use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use spotiview::{
    Res, SpotiviewError,
    player::{PlaybackBackend, PlaybackHandle, PreviewPlayer},
};

/// Records which clips are currently playing.
#[derive(Clone, Default)]
struct FakeBackend {
    playing: Arc<Mutex<Vec<String>>>,
    finished: Arc<AtomicBool>,
}

impl FakeBackend {
    fn playing(&self) -> Vec<String> {
        self.playing.lock().unwrap().clone()
    }
}

struct FakeHandle {
    source: String,
    backend: FakeBackend,
}

impl PlaybackHandle for FakeHandle {
    fn source(&self) -> &str {
        &self.source
    }

    fn stop(&mut self) -> Res<()> {
        self.backend.playing.lock().unwrap().retain(|s| s != &self.source);
        Ok(())
    }

    fn is_finished(&mut self) -> bool {
        self.backend.finished.load(Ordering::SeqCst)
    }
}

impl PlaybackBackend for FakeBackend {
    type Handle = FakeHandle;

    fn start(&self, url: &str) -> Res<FakeHandle> {
        if url.is_empty() {
            return Err(SpotiviewError::Playback("no preview".to_string()));
        }
        self.playing.lock().unwrap().push(url.to_string());
        Ok(FakeHandle {
            source: url.to_string(),
            backend: self.clone(),
        })
    }
}

#[test]
fn test_at_most_one_clip_plays() {
    let backend = FakeBackend::default();
    let mut player = PreviewPlayer::new(backend.clone());

    for url in ["https://p.scdn.co/a", "https://p.scdn.co/b", "https://p.scdn.co/c"] {
        player.play(url).unwrap();
        assert_eq!(backend.playing(), vec![url.to_string()]);
    }

    assert_eq!(player.current_source(), Some("https://p.scdn.co/c"));
}

#[test]
fn test_toggle_same_clip_stops_it() {
    let backend = FakeBackend::default();
    let mut player = PreviewPlayer::new(backend.clone());

    assert!(player.toggle("https://p.scdn.co/a").unwrap());
    assert!(player.toggle("https://p.scdn.co/b").unwrap());
    assert_eq!(backend.playing(), vec!["https://p.scdn.co/b".to_string()]);

    assert!(!player.toggle("https://p.scdn.co/b").unwrap());
    assert!(backend.playing().is_empty());
    assert_eq!(player.current_source(), None);
}

#[test]
fn test_failed_start_leaves_nothing_playing() {
    let backend = FakeBackend::default();
    let mut player = PreviewPlayer::new(backend.clone());

    player.play("https://p.scdn.co/a").unwrap();
    assert!(player.play("").is_err());

    assert!(backend.playing().is_empty());
    assert!(!player.is_playing());
}

#[test]
fn test_finished_clip_releases_slot() {
    let backend = FakeBackend::default();
    let mut player = PreviewPlayer::new(backend.clone());

    player.play("https://p.scdn.co/a").unwrap();
    assert!(player.is_playing());

    backend.finished.store(true, Ordering::SeqCst);
    assert!(!player.is_playing());
    assert_eq!(player.current_source(), None);

    player.stop().unwrap();
}
