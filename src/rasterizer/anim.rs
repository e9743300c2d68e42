//! Frame animation on top of [`Sprite`]
//!
//! Clip records are stored back to back with no index:
//! `[frame_count][mode][tick_interval][frame ids...]`, one byte each.
//! `play(n)` walks the records from the start to find clip `n`.

use super::render::Framebuffer;
use super::renderable::{Origin, Renderable};
use super::sprite::{Sprite, SpriteSheet};
use crate::error::AssetError;

/// What happens when a clip runs past its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop,
    OneShot,
}

impl PlayMode {
    fn from_byte(clip: usize, mode: u8) -> Result<Self, AssetError> {
        match mode {
            0 => Ok(PlayMode::Loop),
            1 => Ok(PlayMode::OneShot),
            _ => Err(AssetError::UnknownMode { clip, mode }),
        }
    }
}

/// Validated clip records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipTable {
    data: Vec<u8>,
    clips: usize,
}

impl ClipTable {
    /// Validate every record once so playback never reads past the data.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self, AssetError> {
        let data = data.into();
        let mut offset = 0;
        let mut clip = 0;
        while offset < data.len() {
            let header = data.get(offset..offset + 3).ok_or(AssetError::Truncated {
                what: "clip header",
                expected: 3,
                actual: data.len() - offset,
            })?;
            let count = header[0] as usize;
            if count == 0 {
                return Err(AssetError::EmptyClip { clip });
            }
            PlayMode::from_byte(clip, header[1])?;
            let available = data.len() - offset - 3;
            if available < count {
                return Err(AssetError::Truncated {
                    what: "clip frames",
                    expected: count,
                    actual: available,
                });
            }
            offset += 3 + count;
            clip += 1;
        }
        Ok(Self { data, clips: clip })
    }

    pub fn len(&self) -> usize {
        self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips == 0
    }

    /// Byte offset of clip `id`, walking the records in order.
    fn offset_of(&self, id: u8) -> Option<usize> {
        if id as usize >= self.clips {
            return None;
        }
        let mut offset = 0;
        for _ in 0..id {
            offset += 3 + self.data[offset] as usize;
        }
        Some(offset)
    }

    fn record(&self, offset: usize) -> Clip<'_> {
        let count = self.data[offset] as usize;
        Clip {
            mode: if self.data[offset + 1] == 0 {
                PlayMode::Loop
            } else {
                PlayMode::OneShot
            },
            interval: self.data[offset + 2],
            frames: &self.data[offset + 3..offset + 3 + count],
        }
    }
}

struct Clip<'a> {
    mode: PlayMode,
    interval: u8,
    frames: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Stopped,
    Playing {
        clip: u8,
        offset: usize,
        index: usize,
        counter: u8,
    },
}

/// Sprite plus a playback cursor into a shared clip table.
#[derive(Debug, Clone, Copy)]
pub struct Anim {
    pub sprite: Sprite,
    clips: Option<&'static ClipTable>,
    playback: Playback,
    /// Added to every resolved frame id (palette or variant rows).
    pub frame_offset: u16,
    pub origin: Origin,
}

impl Default for Anim {
    fn default() -> Self {
        Self {
            sprite: Sprite::default(),
            clips: None,
            playback: Playback::Stopped,
            frame_offset: 0,
            origin: Origin::default(),
        }
    }
}

impl Anim {
    pub fn new(sheet: &'static SpriteSheet, clips: &'static ClipTable) -> Self {
        Self {
            sprite: Sprite::new(sheet),
            clips: Some(clips),
            ..Self::default()
        }
    }

    pub fn set_origin(&mut self, x: i16, y: i16) {
        self.origin = Origin::new(x, y);
    }

    /// Start clip `id` from its first frame. Unknown ids stop the animation.
    pub fn play(&mut self, id: u8) {
        let offset = self.clips.and_then(|table| table.offset_of(id));
        self.playback = match offset {
            Some(offset) => Playback::Playing {
                clip: id,
                offset,
                index: 0,
                counter: 0,
            },
            None => {
                log::warn!("anim: no clip {id}, stopping");
                Playback::Stopped
            }
        };
    }

    /// Play `id` unless it is already the running clip.
    pub fn play_if_changed(&mut self, id: u8) {
        if self.current_clip() != Some(id) {
            self.play(id);
        }
    }

    pub fn stop(&mut self) {
        self.playback = Playback::Stopped;
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    pub fn current_clip(&self) -> Option<u8> {
        match self.playback {
            Playback::Playing { clip, .. } => Some(clip),
            Playback::Stopped => None,
        }
    }

    /// Index into the running clip's frame list.
    pub fn frame_index(&self) -> Option<usize> {
        match self.playback {
            Playback::Playing { index, .. } => Some(index),
            Playback::Stopped => None,
        }
    }

    /// Advance one tick and draw the resolved frame.
    pub fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        let Some(table) = self.clips else { return };
        let Playback::Playing {
            offset,
            index,
            counter,
            ..
        } = &mut self.playback
        else {
            return;
        };

        let clip = table.record(*offset);
        if clip.interval > 0 {
            *counter += 1;
            if *counter == clip.interval {
                *index += 1;
                if *index == clip.frames.len() {
                    match clip.mode {
                        PlayMode::Loop => *index = 0,
                        PlayMode::OneShot => {
                            self.playback = Playback::Stopped;
                            return;
                        }
                    }
                }
                *counter = 0;
            }
        }

        self.sprite.frame = (clip.frames[*index] as u16).wrapping_add(self.frame_offset);
        let (x, y) = self.origin.apply(x, y);
        self.sprite.draw(fb, x, y);
    }
}

impl Renderable for Anim {
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        Anim::draw(self, fb, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOP: u8 = 0;
    const ONE_SHOT: u8 = 1;

    fn leak<T>(value: T) -> &'static T {
        Box::leak(Box::new(value))
    }

    /// 1x1 sheet whose frame `n` is the pixel value `n + 1`.
    fn sheet() -> &'static SpriteSheet {
        leak(SpriteSheet::new(1, 1, 0, (1..=8).collect()).unwrap())
    }

    fn drawn(anim: &mut Anim) -> u16 {
        let mut fb = Framebuffer::new(1, 1);
        anim.draw(&mut fb, 0, 0);
        fb.pixels[0]
    }

    #[test]
    fn test_table_validation() {
        let table = ClipTable::from_bytes(vec![2, LOOP, 1, 0, 1, 1, ONE_SHOT, 0, 3]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.offset_of(1), Some(5));
        assert_eq!(table.offset_of(2), None);

        assert_eq!(
            ClipTable::from_bytes(vec![0, LOOP, 1]),
            Err(AssetError::EmptyClip { clip: 0 })
        );
        assert_eq!(
            ClipTable::from_bytes(vec![1, LOOP, 1, 0, 1, 7, 1, 0]),
            Err(AssetError::UnknownMode { clip: 1, mode: 7 })
        );
        assert!(matches!(
            ClipTable::from_bytes(vec![3, LOOP, 1, 0]),
            Err(AssetError::Truncated { what: "clip frames", .. })
        ));
        assert!(matches!(
            ClipTable::from_bytes(vec![1, LOOP]),
            Err(AssetError::Truncated { what: "clip header", .. })
        ));
    }

    #[test]
    fn test_loop_returns_to_first_frame() {
        let clips = leak(ClipTable::from_bytes(vec![3, LOOP, 2, 0, 1, 2]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(0);

        let mut seen = Vec::new();
        for _ in 0..12 {
            seen.push(drawn(&mut anim));
        }
        assert_eq!(seen, vec![1, 2, 2, 3, 3, 1, 1, 2, 2, 3, 3, 1]);
        assert_eq!(anim.frame_index(), Some(0));
    }

    #[test]
    fn test_one_shot_stops_and_ignores_ticks() {
        let clips = leak(ClipTable::from_bytes(vec![3, ONE_SHOT, 2, 0, 1, 2]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(0);

        let seen: Vec<u16> = (0..8).map(|_| drawn(&mut anim)).collect();
        assert_eq!(seen, vec![1, 2, 2, 3, 3, 0, 0, 0]);
        assert!(!anim.is_playing());

        anim.play(0);
        assert_eq!(drawn(&mut anim), 1);
    }

    #[test]
    fn test_zero_interval_is_static() {
        let clips = leak(ClipTable::from_bytes(vec![2, LOOP, 0, 4, 5]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(0);
        for _ in 0..5 {
            assert_eq!(drawn(&mut anim), 5);
        }
    }

    #[test]
    fn test_frame_offset_and_clip_lookup() {
        let clips = leak(ClipTable::from_bytes(vec![1, LOOP, 0, 0, 2, LOOP, 0, 3, 3]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(1);
        assert_eq!(drawn(&mut anim), 4);
        anim.frame_offset = 2;
        assert_eq!(drawn(&mut anim), 6);
    }

    #[test]
    fn test_unknown_clip_stops() {
        let clips = leak(ClipTable::from_bytes(vec![1, LOOP, 0, 0]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(0);
        assert!(anim.is_playing());
        anim.play(3);
        assert!(!anim.is_playing());
        assert_eq!(drawn(&mut anim), 0);
    }

    #[test]
    fn test_play_if_changed_keeps_cursor() {
        let clips = leak(ClipTable::from_bytes(vec![2, LOOP, 1, 0, 1, 1, LOOP, 0, 2]).unwrap());
        let mut anim = Anim::new(sheet(), clips);
        anim.play(0);
        drawn(&mut anim);
        anim.play_if_changed(0);
        assert_eq!(anim.frame_index(), Some(1));
        anim.play_if_changed(1);
        assert_eq!(anim.current_clip(), Some(1));
        assert_eq!(anim.frame_index(), Some(0));
    }
}
