use std::convert::Infallible;

use engine::{AssetError, AssetStore, FontHandle, ImageHandle};

use super::genetics::Base;

pub(crate) const DEFAULT_FONT_FILE: &str = "CourierPrime-Regular.ttf";
pub(crate) const DEFAULT_FONT_SIZE: u32 = 32;
pub(crate) const CODON_FONT_FILE: &str = "BlackOpsOne-Regular.ttf";
pub(crate) const CODON_FONT_SIZE: u32 = 60;
pub(crate) const MENU_TRACK_FILE: &str = "Signaling_of_the_Cell_MenuScreen.mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fonts {
    pub(crate) default: FontHandle,
    pub(crate) codon: FontHandle,
}

impl Fonts {
    /// Both fonts resized for a display scale factor in percent.
    pub(crate) fn resized(&self, percent: u32) -> Self {
        Self {
            default: self.default.resized(percent),
            codon: self.codon.resized(percent),
        }
    }
}

/// Every image the scenes draw, loaded once at startup.
#[derive(Debug, Clone)]
pub(crate) struct Art {
    pub(crate) menu_layers: [ImageHandle; 3],
    pub(crate) title: ImageHandle,
    pub(crate) play_button: ImageHandle,
    pub(crate) level_select_button: ImageHandle,
    pub(crate) about_button: ImageHandle,
    pub(crate) volume_on: ImageHandle,
    pub(crate) volume_off: ImageHandle,
    pub(crate) about_page: ImageHandle,
    pub(crate) level_buttons: [ImageHandle; 4],
    pub(crate) menu_button: ImageHandle,
    pub(crate) info_button: ImageHandle,
    pub(crate) info_page: ImageHandle,
    pub(crate) next_button: ImageHandle,
    pub(crate) plasma_background: ImageHandle,
    pub(crate) cytoplasm_background: ImageHandle,
    pub(crate) nucleus_background: ImageHandle,
    pub(crate) translation_background: ImageHandle,
    pub(crate) signal: ImageHandle,
    pub(crate) receptor: ImageHandle,
    pub(crate) receptor_active: ImageHandle,
    pub(crate) kinase: ImageHandle,
    pub(crate) kinase_active: ImageHandle,
    pub(crate) transcription_factor: ImageHandle,
    pub(crate) transcription_factor_active: ImageHandle,
    pub(crate) dna: ImageHandle,
    pub(crate) rna: ImageHandle,
    pub(crate) polymerase: ImageHandle,
    pub(crate) ribosome: ImageHandle,
    pub(crate) codon_button: ImageHandle,
    pub(crate) adenine: ImageHandle,
    pub(crate) thymine: ImageHandle,
    pub(crate) guanine: ImageHandle,
    pub(crate) cytosine: ImageHandle,
    pub(crate) uracil: ImageHandle,
    pub(crate) empty_base: ImageHandle,
    pub(crate) amino_acid: ImageHandle,
    pub(crate) fonts: Fonts,
}

impl Art {
    pub(crate) fn load(store: &AssetStore) -> Result<Self, AssetError> {
        let fonts = Fonts {
            default: store.load_font(DEFAULT_FONT_FILE, DEFAULT_FONT_SIZE)?,
            codon: store.load_font(CODON_FONT_FILE, CODON_FONT_SIZE)?,
        };
        Self::build(fonts, |name| store.load_image(name))
    }

    /// Named 1x1 images. Lets scenes run without an asset folder.
    pub(crate) fn placeholder() -> Self {
        let fonts = Fonts {
            default: FontHandle::with_size(DEFAULT_FONT_SIZE),
            codon: FontHandle::with_size(CODON_FONT_SIZE),
        };
        let built: Result<Self, Infallible> =
            Self::build(fonts, |name| Ok(ImageHandle::placeholder(name)));
        match built {
            Ok(art) => art,
            Err(never) => match never {},
        }
    }

    fn build<E>(
        fonts: Fonts,
        mut image: impl FnMut(&str) -> Result<ImageHandle, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            menu_layers: [
                image("menuBg1.png")?,
                image("menuBg2.png")?,
                image("menuBg3.png")?,
            ],
            title: image("title.png")?,
            play_button: image("playButton.png")?,
            level_select_button: image("levelSelectButton.png")?,
            about_button: image("aboutButton.png")?,
            volume_on: image("volumeOn.png")?,
            volume_off: image("volumeOff.png")?,
            about_page: image("aboutPage.png")?,
            level_buttons: [
                image("receptionButton.png")?,
                image("transductionButton.png")?,
                image("transcriptionButton.png")?,
                image("translationButton.png")?,
            ],
            menu_button: image("menuButton.png")?,
            info_button: image("infoButton.png")?,
            info_page: image("infoPage.png")?,
            next_button: image("nextButton.png")?,
            plasma_background: image("PlasmaBg.png")?,
            cytoplasm_background: image("CytoBg1.png")?,
            nucleus_background: image("NucleusBg.png")?,
            translation_background: image("CytoBg2.png")?,
            signal: image("signal.png")?,
            receptor: image("receptor.png")?,
            receptor_active: image("act_receptor.png")?,
            kinase: image("kinase.png")?,
            kinase_active: image("act_kinase.png")?,
            transcription_factor: image("TFA.png")?,
            transcription_factor_active: image("act_TFA.png")?,
            dna: image("DNA.png")?,
            rna: image("RNA.png")?,
            polymerase: image("rnaPolym.png")?,
            ribosome: image("ribosome.png")?,
            codon_button: image("codonButton.png")?,
            adenine: image("adenine.png")?,
            thymine: image("thymine.png")?,
            guanine: image("guanine.png")?,
            cytosine: image("cytosine.png")?,
            uracil: image("uracil.png")?,
            empty_base: image("empty.png")?,
            amino_acid: image("aminoAcid.png")?,
            fonts,
        })
    }

    pub(crate) fn base_image(&self, base: Base) -> &ImageHandle {
        match base {
            Base::A => &self.adenine,
            Base::T => &self.thymine,
            Base::G => &self.guanine,
            Base::C => &self.cytosine,
            Base::U => &self.uracil,
        }
    }
}
