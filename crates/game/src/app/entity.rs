use engine::{
    Canvas, Color, DisplayScale, DrawTransform, ImageHandle, InputSnapshot, MouseButton, Rect,
    Resolution, Vector, BASE_RESOLUTION,
};

use super::art::{Art, Fonts};
use super::drag::{DragController, GrabMode};
use super::genetics::{AminoAcid, Base, Codon};
use super::motion::{Follower, MotionEvent, PathScript, PatrolScript, Tether, WalkerScript};
use super::puzzle::{CodonPuzzle, TileFace};
use super::scenes::{SceneId, INFO_TEXT_POS};

pub(crate) const LAYER_BACKGROUND: i32 = 0;
pub(crate) const LAYER_SCENERY: i32 = 10;
pub(crate) const LAYER_ACTORS: i32 = 20;
pub(crate) const LAYER_TILES: i32 = 30;
pub(crate) const LAYER_UI: i32 = 40;
pub(crate) const LAYER_MODAL: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EntityId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visual {
    Primary,
    Alternate,
}

#[derive(Debug, Clone)]
pub(crate) struct Sprite {
    /// Display coordinates.
    pub(crate) rect: Rect,
    pub(crate) primary: ImageHandle,
    pub(crate) alternate: Option<ImageHandle>,
    pub(crate) visual: Visual,
    pub(crate) visible: bool,
    pub(crate) layer: i32,
    pub(crate) transform: DrawTransform,
    origin: Option<ResizeOrigin>,
}

/// Where a sprite was last placed by something other than a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResizeOrigin {
    rect: Rect,
    resolution: Resolution,
    placed: Rect,
}

impl Sprite {
    /// `rect` is in base coordinates until the sprite is spawned.
    pub(crate) fn new(image: &ImageHandle, rect: Rect, layer: i32) -> Self {
        Self {
            rect,
            primary: image.clone(),
            alternate: None,
            visual: Visual::Primary,
            visible: true,
            layer,
            transform: DrawTransform::IDENTITY,
            origin: None,
        }
    }

    pub(crate) fn with_alternate(mut self, image: &ImageHandle) -> Self {
        self.alternate = Some(image.clone());
        self
    }

    pub(crate) fn with_transform(mut self, transform: DrawTransform) -> Self {
        self.transform = transform;
        self
    }

    pub(crate) fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub(crate) fn image(&self) -> &ImageHandle {
        match (self.visual, &self.alternate) {
            (Visual::Alternate, Some(alternate)) => alternate,
            _ => &self.primary,
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_image(self.image(), self.rect, self.transform);
    }

    /// A sprite that has not moved since the last resize is mapped from its origin,
    /// so resizing back to an earlier resolution restores the same rect.
    fn rescale(&mut self, from: Resolution, to: Resolution) {
        let (rect, resolution) = match self.origin {
            Some(origin) if origin.placed == self.rect => (origin.rect, origin.resolution),
            _ => (self.rect, from),
        };
        self.rect = rect.rescaled(resolution, to);
        self.origin = Some(ResizeOrigin {
            rect,
            resolution,
            placed: self.rect,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Glyph {
    Base(Base),
    Amino(AminoAcid),
    Empty,
}

/// One symbol drawn under a codon. Bases not on the template are drawn upside down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Nucleobase {
    pub(crate) glyph: Glyph,
    pub(crate) index: usize,
    pub(crate) is_template: bool,
}

impl Nucleobase {
    pub(crate) fn of_codon(codon: Codon, is_template: bool) -> [Nucleobase; 3] {
        let bases = codon.bases();
        [0, 1, 2].map(|index| Nucleobase {
            glyph: Glyph::Base(bases[index]),
            index,
            is_template,
        })
    }

    pub(crate) fn amino(amino: AminoAcid) -> Self {
        let glyph = match amino {
            AminoAcid::Stop => Glyph::Empty,
            other => Glyph::Amino(other),
        };
        Self {
            glyph,
            index: 0,
            is_template: true,
        }
    }

    fn image<'a>(&self, art: &'a Art) -> &'a ImageHandle {
        match self.glyph {
            Glyph::Base(base) => art.base_image(base),
            Glyph::Amino(_) => &art.amino_acid,
            Glyph::Empty => &art.empty_base,
        }
    }

    pub(crate) fn label(&self) -> String {
        match self.glyph {
            Glyph::Base(base) => base.symbol().to_string(),
            Glyph::Amino(amino) => amino.label().to_string(),
            Glyph::Empty => AminoAcid::Stop.label().to_string(),
        }
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>, rect: Rect) {
        let transform = if self.is_template {
            DrawTransform::IDENTITY
        } else {
            DrawTransform::rotated_half_turn()
        };
        canvas.draw_image(self.image(ctx.art), rect, transform);
        let label_y = if self.is_template {
            rect.bottom() - ctx.scale.y(40)
        } else {
            rect.pos.y + ctx.scale.y(5)
        };
        canvas.draw_text(
            &ctx.fonts.default,
            &self.label(),
            rect.pos.x + ctx.scale.x(5),
            label_y,
            Color::BLACK,
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Role {
    Still,
    Parallax {
        follower: Follower,
    },
    Receptor {
        follower: Follower,
    },
    /// Draggable until bound to a receptor. May not be dragged below `floor`'s top edge.
    Signal {
        floor: EntityId,
        bound: Option<Tether>,
    },
    /// Tethered kinase under a receptor. Follows the pointer until its path starts.
    Relay {
        follower: Follower,
        path: PathScript,
    },
    Kinase {
        patrol: PatrolScript,
    },
    TranscriptionFactor {
        path: PathScript,
    },
    Polymerase {
        walker: WalkerScript,
    },
    Ribosome {
        walker: WalkerScript,
    },
    CodonTile {
        face: TileFace,
    },
    TransferRna {
        face: TileFace,
    },
    Strand {
        tether: Option<Tether>,
        bases: Option<[Nucleobase; 3]>,
    },
    Button {
        target: SceneId,
    },
    VolumeToggle,
    InfoPage {
        open: bool,
        button_rect: Rect,
        text: &'static str,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EntityFlags {
    /// A motion script has left its idle state.
    pub(crate) engaged: bool,
    pub(crate) finished: bool,
}

/// Rects and flags of every entity, captured once before any entity updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FrameSnapshot {
    entries: Vec<(Rect, EntityFlags)>,
}

impl FrameSnapshot {
    pub(crate) fn from_entries(entries: Vec<(Rect, EntityFlags)>) -> Self {
        Self { entries }
    }

    pub(crate) fn rect(&self, id: EntityId) -> Option<Rect> {
        self.entries.get(id.0 as usize).map(|(rect, _)| *rect)
    }

    pub(crate) fn flags(&self, id: EntityId) -> EntityFlags {
        self.entries
            .get(id.0 as usize)
            .map(|(_, flags)| *flags)
            .unwrap_or_default()
    }

    pub(crate) fn is_finished(&self, id: EntityId) -> bool {
        self.flags(id).finished
    }
}

/// The part of a puzzle the movers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PuzzleView {
    pub(crate) active_index: usize,
    pub(crate) active_completed: bool,
}

impl PuzzleView {
    pub(crate) fn of(puzzle: &CodonPuzzle) -> Self {
        Self {
            active_index: puzzle.active_index(),
            active_completed: puzzle.active_fragment().completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityEvent {
    Navigate(SceneId),
    ToggleMusic,
    Dropped { entity: EntityId, rect: Rect },
    Activated(EntityId),
    PathEnded(EntityId),
    InfoToggled { open: bool },
}

pub(crate) struct UpdateContext<'a> {
    pub(crate) input: InputSnapshot,
    pub(crate) scale: DisplayScale,
    pub(crate) frame: &'a FrameSnapshot,
    pub(crate) puzzle: Option<PuzzleView>,
    pub(crate) music_enabled: bool,
    pub(crate) events: &'a mut Vec<EntityEvent>,
}

pub(crate) struct DrawContext<'a> {
    pub(crate) art: &'a Art,
    pub(crate) fonts: Fonts,
    pub(crate) scale: DisplayScale,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(art: &'a Art, scale: DisplayScale) -> Self {
        let percent = scale.y(100).max(1) as u32;
        Self {
            art,
            fonts: art.fonts.resized(percent),
            scale,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) sprite: Sprite,
    pub(crate) role: Role,
}

impl Entity {
    pub(crate) fn grab_mode(&self) -> Option<GrabMode> {
        if !self.sprite.visible {
            return None;
        }
        match self.role {
            Role::Signal { bound: None, .. } => Some(GrabMode::Centered),
            Role::CodonTile { .. } | Role::TransferRna { .. } => Some(GrabMode::KeepOffset),
            _ => None,
        }
    }

    pub(crate) fn face(&self) -> Option<TileFace> {
        match self.role {
            Role::CodonTile { face } | Role::TransferRna { face } => Some(face),
            _ => None,
        }
    }

    fn flags(&self) -> EntityFlags {
        match &self.role {
            Role::Relay { path, .. } | Role::TranscriptionFactor { path } => EntityFlags {
                engaged: path.has_started(),
                finished: path.is_finished(),
            },
            Role::Kinase { patrol } => EntityFlags {
                engaged: patrol.is_engaged(),
                finished: patrol.is_finished(),
            },
            Role::Polymerase { walker } | Role::Ribosome { walker } => EntityFlags {
                engaged: true,
                finished: walker.is_finished(),
            },
            Role::Signal { bound, .. } => EntityFlags {
                engaged: bound.is_some(),
                finished: bound.is_some(),
            },
            _ => EntityFlags::default(),
        }
    }

    fn clicked(&self, input: &InputSnapshot) -> bool {
        self.sprite.visible
            && input.is_just_pressed(MouseButton::Left)
            && self.sprite.rect.contains(input.cursor_position())
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let clicked = self.clicked(&ctx.input);
        let cursor = ctx.input.cursor_position();
        let rect = &mut self.sprite.rect;
        let motion = match &mut self.role {
            Role::Still
            | Role::CodonTile { .. }
            | Role::TransferRna { .. }
            | Role::Signal { bound: None, .. } => None,
            Role::Parallax { follower } | Role::Receptor { follower } => {
                follower.follow(rect, cursor, &ctx.scale);
                None
            }
            Role::Signal {
                bound: Some(tether),
                ..
            } => {
                tether.follow(rect, ctx.frame, &ctx.scale);
                None
            }
            Role::Relay { follower, path } => {
                if !path.has_started() {
                    follower.follow(rect, cursor, &ctx.scale);
                }
                path.step(rect, ctx.frame, &ctx.scale)
            }
            Role::Kinase { patrol } => patrol.step(rect, clicked, ctx.frame, &ctx.scale),
            Role::TranscriptionFactor { path } => path.step(rect, ctx.frame, &ctx.scale),
            Role::Polymerase { walker } | Role::Ribosome { walker } => {
                walker.step(rect, ctx.puzzle, ctx.frame, &ctx.scale)
            }
            Role::Strand { tether, .. } => {
                if let Some(tether) = tether {
                    tether.follow(rect, ctx.frame, &ctx.scale);
                }
                None
            }
            Role::Button { target } => {
                if clicked {
                    ctx.events.push(EntityEvent::Navigate(*target));
                }
                None
            }
            Role::VolumeToggle => {
                if clicked {
                    ctx.events.push(EntityEvent::ToggleMusic);
                }
                None
            }
            Role::InfoPage {
                open, button_rect, ..
            } => {
                if clicked {
                    *open = !*open;
                    *rect = if *open {
                        full_screen(ctx.scale.target())
                    } else {
                        ctx.scale.rect(*button_rect)
                    };
                    ctx.events.push(EntityEvent::InfoToggled { open: *open });
                }
                None
            }
        };

        match &self.role {
            Role::VolumeToggle => {
                self.sprite.visual = if ctx.music_enabled {
                    Visual::Primary
                } else {
                    Visual::Alternate
                };
            }
            Role::InfoPage { open, .. } => {
                self.sprite.visual = if *open {
                    Visual::Alternate
                } else {
                    Visual::Primary
                };
            }
            _ => {}
        }

        match motion {
            Some(MotionEvent::Activated) => {
                self.sprite.visual = Visual::Alternate;
                ctx.events.push(EntityEvent::Activated(self.id));
            }
            Some(MotionEvent::PathEnded) => ctx.events.push(EntityEvent::PathEnded(self.id)),
            None => {}
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, ctx: &DrawContext<'_>) {
        self.sprite.draw(canvas);
        let rect = self.sprite.rect;
        let scale = &ctx.scale;
        match &self.role {
            Role::CodonTile { face } => draw_tile_face(canvas, ctx, rect, face),
            Role::TransferRna { face } => {
                draw_tile_face(canvas, ctx, rect, face);
                if let Some(amino) = face.amino_acid() {
                    let label = Rect::new(
                        rect.pos.x + scale.x(25),
                        rect.pos.y - scale.y(25),
                        scale.x(140),
                        scale.y(50),
                    );
                    Nucleobase::amino(amino).draw(canvas, ctx, label);
                }
            }
            Role::Strand {
                bases: Some(bases), ..
            } => {
                for base in bases {
                    let slot = Rect::new(
                        rect.pos.x + scale.x(50 * base.index as i32),
                        rect.pos.y + scale.y(25),
                        scale.x(50),
                        scale.y(100),
                    );
                    base.draw(canvas, ctx, slot);
                }
            }
            Role::InfoPage {
                open: true, text, ..
            } => {
                let pos = scale.point(INFO_TEXT_POS);
                canvas.draw_text(&ctx.fonts.default, text, pos.x, pos.y, Color::PURPLE);
            }
            _ => {}
        }
    }
}

fn draw_tile_face(canvas: &mut dyn Canvas, ctx: &DrawContext<'_>, rect: Rect, face: &TileFace) {
    let scale = &ctx.scale;
    canvas.draw_text(
        &ctx.fonts.codon,
        &face.codon.to_string(),
        rect.pos.x + scale.x(25),
        rect.pos.y + scale.y(40),
        Color::BLACK,
    );
    for base in Nucleobase::of_codon(face.codon, false) {
        let slot = Rect::new(
            rect.pos.x + scale.x(15 + 55 * base.index as i32),
            rect.bottom(),
            scale.x(50),
            scale.y(110),
        );
        base.draw(canvas, ctx, slot);
    }
}

fn full_screen(resolution: Resolution) -> Rect {
    Rect::new(0, 0, resolution.width as i32, resolution.height as i32)
}

/// Entities of one scene in spawn order. Spawn order is update order.
#[derive(Debug, Clone)]
pub(crate) struct EntitySet {
    entities: Vec<Entity>,
    scale: DisplayScale,
}

impl EntitySet {
    pub(crate) fn new(resolution: Resolution) -> Self {
        Self {
            entities: Vec::new(),
            scale: DisplayScale::from_base(resolution),
        }
    }

    pub(crate) fn scale(&self) -> DisplayScale {
        self.scale
    }

    /// Spawns with `sprite.rect` given in base coordinates.
    pub(crate) fn spawn(&mut self, mut sprite: Sprite, role: Role) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        let base = sprite.rect;
        sprite.rect = self.scale.rect(base);
        sprite.origin = Some(ResizeOrigin {
            rect: base,
            resolution: BASE_RESOLUTION,
            placed: sprite.rect,
        });
        self.entities.push(Entity { id, sprite, role });
        id
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0 as usize)
    }

    pub(crate) fn rect(&self, id: EntityId) -> Option<Rect> {
        self.get(id).map(|entity| entity.sprite.rect)
    }

    pub(crate) fn set_role(&mut self, id: EntityId, role: Role) {
        if let Some(entity) = self.get_mut(id) {
            entity.role = role;
        }
    }

    /// Moves an entity to a base-coordinate position.
    pub(crate) fn place(&mut self, id: EntityId, base_pos: Vector) {
        let pos = self.scale.point(base_pos);
        if let Some(entity) = self.get_mut(id) {
            entity.sprite.rect.pos = pos;
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    pub(crate) fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::from_entries(
            self.entities
                .iter()
                .map(|entity| (entity.sprite.rect, entity.flags()))
                .collect(),
        )
    }

    /// An open info page, or the pointer resting on its button, hides clicks from everything else.
    pub(crate) fn is_modal(&self, cursor: Vector) -> bool {
        self.entities.iter().any(|entity| match entity.role {
            Role::InfoPage { open, .. } => {
                entity.sprite.visible && (open || entity.sprite.rect.contains(cursor))
            }
            _ => false,
        })
    }

    /// Runs one frame: drag press, drag move, snapshot, role updates, drag release.
    pub(crate) fn update(
        &mut self,
        input: &InputSnapshot,
        drag: &mut DragController,
        puzzle: Option<PuzzleView>,
        music_enabled: bool,
    ) -> Vec<EntityEvent> {
        let cursor = input.cursor_position();
        let modal = self.is_modal(cursor);
        let masked = input.without_buttons();

        if !modal && input.is_just_pressed(MouseButton::Left) {
            let candidates = self.drag_candidates();
            drag.press(&candidates, cursor);
        }
        if let (Some(id), Some(pos)) = (drag.dragged(), drag.drag_position(cursor)) {
            self.move_dragged(id, pos);
        }

        let frame = self.snapshot();
        let mut events = Vec::new();
        for entity in &mut self.entities {
            let entity_input = if modal && !matches!(entity.role, Role::InfoPage { .. }) {
                masked
            } else {
                *input
            };
            let mut ctx = UpdateContext {
                input: entity_input,
                scale: self.scale,
                frame: &frame,
                puzzle,
                music_enabled,
                events: &mut events,
            };
            entity.update(&mut ctx);
        }

        if !input.is_pressed(MouseButton::Left) {
            if let Some(entity) = drag.release() {
                if let Some(rect) = self.rect(entity) {
                    events.push(EntityEvent::Dropped { entity, rect });
                }
            }
        }
        events
    }

    /// Draggable entities under consideration for a press, topmost first.
    fn drag_candidates(&self) -> Vec<(EntityId, Rect, GrabMode)> {
        let mut candidates: Vec<(i32, EntityId, Rect, GrabMode)> = self
            .entities
            .iter()
            .filter_map(|entity| {
                let mode = entity.grab_mode()?;
                Some((entity.sprite.layer, entity.id, entity.sprite.rect, mode))
            })
            .collect();
        candidates.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        candidates
            .into_iter()
            .map(|(_, id, rect, mode)| (id, rect, mode))
            .collect()
    }

    fn move_dragged(&mut self, id: EntityId, mut pos: Vector) {
        let floor = match self.get(id).map(|entity| &entity.role) {
            Some(Role::Signal { floor, .. }) => self.rect(*floor),
            _ => None,
        };
        if let Some(floor) = floor {
            pos.y = pos.y.min(floor.pos.y);
        }
        if let Some(entity) = self.get_mut(id) {
            entity.sprite.rect.pos = pos;
        }
    }

    /// Back to front by layer, then spawn order.
    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, art: &Art) {
        let ctx = DrawContext::new(art, self.scale);
        let mut order: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|entity| entity.sprite.visible)
            .collect();
        order.sort_by_key(|entity| (entity.sprite.layer, entity.id));
        for entity in order {
            entity.draw(canvas, &ctx);
        }
    }

    pub(crate) fn rescale(&mut self, to: Resolution) {
        if to.is_empty() {
            return;
        }
        let from = self.scale.target();
        for entity in &mut self.entities {
            entity.sprite.rescale(from, to);
        }
        self.scale = DisplayScale::from_base(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::motion::{Leg, Trigger, Until};
    use engine::RecordingCanvas;

    fn art() -> Art {
        Art::placeholder()
    }

    fn tile_face() -> TileFace {
        TileFace {
            codon: "AUG".parse().expect("codon"),
            answer: crate::app::puzzle::Answer::Rna("AUG".parse().expect("codon")),
        }
    }

    fn spawn_tile(set: &mut EntitySet, art: &Art, x: i32, layer: i32) -> EntityId {
        set.spawn(
            Sprite::new(&art.codon_button, Rect::new(x, 150, 192, 111), layer),
            Role::CodonTile { face: tile_face() },
        )
    }

    fn press_at(x: i32, y: i32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor(Vector::new(x, y))
            .with_press(MouseButton::Left)
    }

    fn hold_at(x: i32, y: i32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor(Vector::new(x, y))
            .with_held(MouseButton::Left)
    }

    fn release_at(x: i32, y: i32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor(Vector::new(x, y))
            .with_release(MouseButton::Left)
    }

    #[test]
    fn spawn_scales_base_rect() {
        let art = art();
        let mut set = EntitySet::new(Resolution::new(2500, 1500));
        let id = spawn_tile(&mut set, &art, 50, LAYER_TILES);
        assert_eq!(set.rect(id), Some(Rect::new(100, 300, 384, 222)));
    }

    #[test]
    fn drag_moves_tile_and_reports_drop_where_released() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let id = spawn_tile(&mut set, &art, 50, LAYER_TILES);
        let mut drag = DragController::new();

        set.update(&press_at(60, 160), &mut drag, None, true);
        assert!(drag.is_dragging(id));
        set.update(&hold_at(560, 460), &mut drag, None, true);
        assert_eq!(set.rect(id).map(|rect| rect.pos), Some(Vector::new(550, 450)));

        let events = set.update(&release_at(560, 460), &mut drag, None, true);
        assert_eq!(
            events,
            vec![EntityEvent::Dropped {
                entity: id,
                rect: Rect::new(550, 450, 192, 111)
            }]
        );
        assert_eq!(drag.dragged(), None);
    }

    #[test]
    fn topmost_tile_is_grabbed() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let lower = spawn_tile(&mut set, &art, 50, LAYER_TILES);
        let upper = spawn_tile(&mut set, &art, 100, LAYER_TILES);
        let mut drag = DragController::new();
        set.update(&press_at(150, 160), &mut drag, None, true);
        assert!(drag.is_dragging(upper));
        assert!(!drag.is_dragging(lower));
    }

    #[test]
    fn signal_cannot_be_dragged_below_floor() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let floor = set.spawn(
            Sprite::new(&art.receptor, Rect::new(400, 400, 200, 350), LAYER_SCENERY),
            Role::Still,
        );
        let signal = set.spawn(
            Sprite::new(&art.signal, Rect::new(575, 20, 100, 100), LAYER_ACTORS),
            Role::Signal { floor, bound: None },
        );
        let mut drag = DragController::new();
        set.update(&press_at(600, 30), &mut drag, None, true);
        set.update(&hold_at(600, 700), &mut drag, None, true);
        let rect = set.rect(signal).expect("signal");
        assert_eq!(rect.pos, Vector::new(550, 400));
    }

    #[test]
    fn button_click_navigates_and_hidden_button_does_not() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        set.spawn(
            Sprite::new(&art.play_button, Rect::new(0, 0, 100, 100), LAYER_UI),
            Role::Button {
                target: SceneId::About,
            },
        );
        set.spawn(
            Sprite::new(&art.next_button, Rect::new(200, 0, 100, 100), LAYER_UI).hidden(),
            Role::Button {
                target: SceneId::Translation,
            },
        );
        let mut drag = DragController::new();
        let events = set.update(&press_at(10, 10), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::Navigate(SceneId::About)]);
        let events = set.update(&press_at(210, 10), &mut drag, None, true);
        assert!(events.is_empty());
    }

    #[test]
    fn open_info_page_masks_clicks_for_others() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        set.spawn(
            Sprite::new(&art.play_button, Rect::new(0, 300, 100, 100), LAYER_UI),
            Role::Button {
                target: SceneId::About,
            },
        );
        let info_rect = Rect::new(850, 0, 165, 165);
        let info = set.spawn(
            Sprite::new(&art.info_button, info_rect, LAYER_MODAL).with_alternate(&art.info_page),
            Role::InfoPage {
                open: false,
                button_rect: info_rect,
                text: "HELP",
            },
        );
        let mut drag = DragController::new();

        let events = set.update(&press_at(900, 50), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::InfoToggled { open: true }]);
        assert_eq!(set.rect(info), Some(Rect::new(0, 0, 1250, 750)));
        assert_eq!(
            set.get(info).map(|entity| entity.sprite.image().name()),
            Some("infoPage.png")
        );

        let events = set.update(&press_at(10, 310), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::InfoToggled { open: false }]);
        assert_eq!(set.rect(info), Some(info_rect));

        let events = set.update(&press_at(10, 310), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::Navigate(SceneId::About)]);
    }

    #[test]
    fn info_page_text_is_drawn_only_when_open() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let rect = Rect::new(850, 0, 165, 165);
        set.spawn(
            Sprite::new(&art.info_button, rect, LAYER_MODAL).with_alternate(&art.info_page),
            Role::InfoPage {
                open: false,
                button_rect: rect,
                text: "HELP",
            },
        );
        let mut canvas = RecordingCanvas::new(BASE_RESOLUTION);
        set.draw(&mut canvas, &art);
        assert!(canvas.texts().is_empty());

        let mut drag = DragController::new();
        set.update(&press_at(900, 10), &mut drag, None, true);
        canvas.clear();
        set.draw(&mut canvas, &art);
        assert_eq!(canvas.texts(), vec!["HELP"]);
    }

    #[test]
    fn volume_toggle_swaps_image_with_setting() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let toggle = set.spawn(
            Sprite::new(&art.volume_on, Rect::new(0, 0, 50, 50), LAYER_UI)
                .with_alternate(&art.volume_off),
            Role::VolumeToggle,
        );
        let mut drag = DragController::new();
        let events = set.update(&press_at(10, 10), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::ToggleMusic]);
        set.update(&InputSnapshot::empty(), &mut drag, None, false);
        assert_eq!(
            set.get(toggle).map(|entity| entity.sprite.image().name()),
            Some("volumeOff.png")
        );
    }

    #[test]
    fn activated_path_swaps_visual_and_reports() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let factor = set.spawn(
            Sprite::new(&art.transcription_factor, Rect::new(0, 740, 10, 10), LAYER_ACTORS)
                .with_alternate(&art.transcription_factor_active),
            Role::TranscriptionFactor {
                path: PathScript::new(
                    Trigger::Immediately,
                    vec![Leg::new(0, 2, Until::OffScreenBottom)],
                ),
            },
        );
        let mut drag = DragController::new();
        let events = set.update(&InputSnapshot::empty(), &mut drag, None, true);
        assert_eq!(events, vec![EntityEvent::Activated(factor)]);
        assert_eq!(
            set.get(factor).map(|entity| entity.sprite.image().name()),
            Some("act_TFA.png")
        );

        let mut ended = Vec::new();
        for _ in 0..10 {
            ended.extend(set.update(&InputSnapshot::empty(), &mut drag, None, true));
        }
        assert_eq!(ended, vec![EntityEvent::PathEnded(factor)]);
        assert!(set.snapshot().is_finished(factor));
    }

    #[test]
    fn draw_orders_by_layer_then_spawn() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        set.spawn(
            Sprite::new(&art.title, Rect::new(0, 0, 10, 10), LAYER_UI),
            Role::Still,
        );
        set.spawn(
            Sprite::new(&art.nucleus_background, Rect::new(0, 0, 10, 10), LAYER_BACKGROUND),
            Role::Still,
        );
        set.spawn(
            Sprite::new(&art.dna, Rect::new(0, 0, 10, 10), LAYER_SCENERY).hidden(),
            Role::Still,
        );
        let mut canvas = RecordingCanvas::new(BASE_RESOLUTION);
        set.draw(&mut canvas, &art);
        assert_eq!(canvas.image_names(), vec!["NucleusBg.png", "title.png"]);
    }

    #[test]
    fn tile_draws_face_and_flipped_bases() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        spawn_tile(&mut set, &art, 50, LAYER_TILES);
        let mut canvas = RecordingCanvas::new(BASE_RESOLUTION);
        set.draw(&mut canvas, &art);
        assert_eq!(
            canvas.image_names(),
            vec!["codonButton.png", "adenine.png", "uracil.png", "guanine.png"]
        );
        assert_eq!(canvas.texts(), vec!["AUG", "A", "U", "G"]);
    }

    #[test]
    fn rescale_maps_rects_to_new_resolution() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let id = spawn_tile(&mut set, &art, 50, LAYER_TILES);
        set.rescale(Resolution::new(2500, 1500));
        assert_eq!(set.rect(id), Some(Rect::new(100, 300, 384, 222)));
        assert_eq!(set.scale().target(), Resolution::new(2500, 1500));
    }

    #[test]
    fn resizing_back_restores_the_same_rect() {
        let art = art();
        let mut set = EntitySet::new(Resolution::new(1333, 777));
        let id = spawn_tile(&mut set, &art, 53, LAYER_TILES);
        let original = set.rect(id).expect("tile");
        for _ in 0..5 {
            set.rescale(Resolution::new(1000, 1000));
            set.rescale(Resolution::new(1920, 1080));
            set.rescale(Resolution::new(1333, 777));
        }
        assert_eq!(set.rect(id), Some(original));
    }

    #[test]
    fn moved_sprite_rescales_from_where_it_was_left() {
        let art = art();
        let mut set = EntitySet::new(BASE_RESOLUTION);
        let id = spawn_tile(&mut set, &art, 50, LAYER_TILES);
        set.place(id, Vector::new(301, 401));
        set.rescale(Resolution::new(625, 375));
        set.rescale(BASE_RESOLUTION);
        assert_eq!(set.rect(id).map(|rect| rect.pos), Some(Vector::new(301, 401)));
    }
}
