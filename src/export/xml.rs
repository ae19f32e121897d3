use crate::ids::Id;
use crate::project::scene::SceneIndex;
use crate::project::track::TrackIndex;
use crate::project::Project;

use super::{ExportError, SAMPLES_DIR};

const MAJOR_VERSION: &str = "5";
const MINOR_VERSION: &str = "12.0_12203";
const SCHEMA_CHANGE_COUNT: &str = "3";
const CREATOR: &str = "Ableton Project Stager";

/// Track colors are laid out by position, offset into the palette.
const TRACK_COLOR_OFFSET: usize = 10;

/// Escapes the five XML metacharacters. Applied to every piece of
/// user-provided text before it is inserted into the document.
pub fn escape_text(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&apos;"),
      _ => escaped.push(c),
    }
  }
  escaped
}

/// Formats a tempo/beat/seconds value. Debug formatting keeps the decimal
/// point for integral values ("120.0"), which is what the .als schema
/// expects for float fields.
fn decimal(value: f64) -> String {
  format!("{:?}", value)
}

/// Builds the complete live set document for the given project.
///
/// Warp marker ids are drawn from the project's allocator while the track
/// entries are generated, and `NextPointeeId` is read from the allocator
/// only after every other id in the document has been consumed.
pub fn live_set_xml(
  project: &mut Project,
  overwrite_protection: u32,
) -> Result<String, ExportError> {
  check_grid_shape(project)?;

  let mut tracks_xml = String::new();
  for track_index in 0..project.get_tracks().len() {
    tracks_xml.push_str(&audio_track_xml(project, track_index));
  }

  let main_track_xml = main_track_xml(project);
  let scenes_xml = scenes_xml(project);

  // All per-clip and per-marker ids have been allocated by now.
  let next_pointee_id = project.next_id();

  Ok(format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Ableton MajorVersion="{major}" MinorVersion="{minor}" SchemaChangeCount="{schema}" Creator="{creator}">
  <LiveSet>
    <NextPointeeId Value="{next_pointee_id}" />
    <OverwriteProtectionNumber Value="{overwrite_protection}" />
    <LomId Value="0" />
    <Tracks>
{tracks_xml}    </Tracks>
{main_track_xml}    <PreHearTrack>
      <LomId Value="0" />
      <Name><EffectiveName Value="Master" /></Name>
      <DevicesListWrapper LomId="0" />
      <ClipSlotsListWrapper LomId="0" />
      <ArrangementClipsListWrapper LomId="0" />
      <TakeLanesListWrapper LomId="0" />
      <DeviceChain />
    </PreHearTrack>
    <SendsPre />
{scenes_xml}    <TracksListWrapper LomId="0" />
    <ReturnTracksListWrapper LomId="0" />
    <ScenesListWrapper LomId="0" />
    <CuePointsListWrapper LomId="0" />
  </LiveSet>
</Ableton>"#,
    major = MAJOR_VERSION,
    minor = MINOR_VERSION,
    schema = SCHEMA_CHANGE_COUNT,
    creator = CREATOR,
    next_pointee_id = next_pointee_id,
    overwrite_protection = overwrite_protection,
    tracks_xml = tracks_xml,
    main_track_xml = main_track_xml,
    scenes_xml = scenes_xml,
  ))
}

fn check_grid_shape(project: &Project) -> Result<(), ExportError> {
  let rows = project.get_grid().len();
  let scenes = project.get_scenes().len();
  if rows != scenes {
    return Err(ExportError::GridRowsMismatch { rows, scenes });
  }
  let tracks = project.get_tracks().len();
  for (row, cells) in project.get_grid().iter().enumerate() {
    if cells.len() != tracks {
      return Err(ExportError::GridColumnsMismatch {
        row,
        cells: cells.len(),
        tracks,
      });
    }
  }
  Ok(())
}

fn audio_track_xml(project: &mut Project, track_index: TrackIndex) -> String {
  let num_scenes = project.get_scenes().len();

  let mut clip_slots = String::new();
  for scene_index in 0..num_scenes {
    clip_slots.push_str(&clip_slot_xml(project, scene_index, track_index));
  }

  let mut empty_clip_slots = String::new();
  for scene_index in 0..num_scenes {
    empty_clip_slots.push_str(&empty_clip_slot_xml(scene_index));
  }

  let track = &project.get_tracks()[track_index];

  format!(
    r#"      <AudioTrack Id="{id}">
        <LomId Value="0" />
        <Name><EffectiveName Value="{name}" /></Name>
        <Color Value="{color}" />
        <TrackGroupId Value="-1" />
        <DevicesListWrapper LomId="0" />
        <ClipSlotsListWrapper LomId="0" />
        <ArrangementClipsListWrapper LomId="0" />
        <TakeLanesListWrapper LomId="0" />
        <DeviceChain>
          <MainSequencer>
            <LomId Value="0" />
            <ClipSlotList>
{clip_slots}            </ClipSlotList>
          </MainSequencer>
          <FreezeSequencer>
            <LomId Value="0" />
            <ClipSlotList>
{empty_clip_slots}            </ClipSlotList>
          </FreezeSequencer>
        </DeviceChain>
      </AudioTrack>
"#,
    id = track.get_id(),
    name = escape_text(track.get_name()),
    color = TRACK_COLOR_OFFSET + track_index,
    clip_slots = clip_slots,
    empty_clip_slots = empty_clip_slots,
  )
}

struct SlotClip {
  id: Id,
  name: String,
  length_in_beats: f64,
  loop_enabled: bool,
  warp_mode: u8,
  duration: f64,
}

fn clip_slot_xml(
  project: &mut Project,
  scene_index: SceneIndex,
  track_index: TrackIndex,
) -> String {
  let slot = project.clip(scene_index, track_index).map(|clip| SlotClip {
    id: clip.get_id(),
    name: escape_text(clip.get_name()),
    length_in_beats: clip.get_length_in_beats(),
    loop_enabled: clip.is_loop_enabled(),
    warp_mode: clip.get_warp_mode().get_value(),
    duration: clip.get_duration(),
  });

  let clip = match slot {
    Some(clip) => clip,
    None => return empty_clip_slot_xml(scene_index),
  };

  let start_marker_id = project.allocate_id();
  let end_marker_id = project.allocate_id();
  let length = decimal(clip.length_in_beats);

  format!(
    r#"              <ClipSlot Id="{slot_id}">
                <LomId Value="0" />
                <ClipSlot>
                  <Value>
                    <AudioClip Id="{clip_id}">
                      <Name Value="{name}" />
                      <CurrentEnd Value="{length}" />
                      <IsWarped Value="true" />
                      <WarpMode Value="{warp_mode}" />
                      <Loop>
                        <LoopOn Value="{loop_on}" />
                        <LoopStart Value="0.0" />
                        <LoopEnd Value="{length}" />
                        <StartRelative Value="0.0" />
                      </Loop>
                      <SampleRef>
                        <FileRef>
                          <Name Value="{name}" />
                          <RelativePath Value="{samples_dir}/{name}" />
                          <Type Value="2" />
                        </FileRef>
                      </SampleRef>
                      <WarpMarkers>
                        <WarpMarker Id="{start_marker_id}" SecTime="0.0" BeatTime="0.0" />
                        <WarpMarker Id="{end_marker_id}" SecTime="{duration}" BeatTime="{length}" />
                      </WarpMarkers>
                    </AudioClip>
                  </Value>
                </ClipSlot>
                <HasStop Value="true" />
              </ClipSlot>
"#,
    slot_id = scene_index,
    clip_id = clip.id,
    name = clip.name,
    length = length,
    warp_mode = clip.warp_mode,
    loop_on = clip.loop_enabled,
    samples_dir = SAMPLES_DIR,
    start_marker_id = start_marker_id,
    end_marker_id = end_marker_id,
    duration = decimal(clip.duration),
  )
}

fn empty_clip_slot_xml(scene_index: SceneIndex) -> String {
  format!(
    "              <ClipSlot Id=\"{}\"><LomId Value=\"0\"/><ClipSlot><Value/></ClipSlot><HasStop Value=\"true\"/></ClipSlot>\n",
    scene_index
  )
}

fn main_track_xml(project: &Project) -> String {
  format!(
    r#"    <MainTrack>
      <LomId Value="0" />
      <Name><EffectiveName Value="Main" /></Name>
      <DeviceChain>
        <Mixer>
          <LomId Value="0" />
          <Tempo><Manual Value="{tempo}" /></Tempo>
        </Mixer>
      </DeviceChain>
    </MainTrack>
"#,
    tempo = decimal(f64::from(project.get_tempo())),
  )
}

fn scenes_xml(project: &Project) -> String {
  let tempo = decimal(f64::from(project.get_tempo()));

  let mut scenes = String::new();
  for (index, scene) in project.get_scenes().iter().enumerate() {
    scenes.push_str(&format!(
      r#"      <Scene Id="{index}">
        <LomId Value="0" />
        <Name Value="{name}" />
        <Color Value="{color}" />
        <Tempo Value="{tempo}" />
        <IsTempoEnabled Value="false" />
        <TimeSignatureId Value="0" />
        <IsTimeSignatureEnabled Value="false" />
        <ClipSlotsListWrapper LomId="0" />
      </Scene>
"#,
      index = index,
      name = escape_text(scene.get_name()),
      color = scene.get_color_index(),
      tempo = tempo,
    ));
  }

  format!("    <Scenes>\n{}    </Scenes>\n", scenes)
}

#[cfg(test)]
mod test {

  use std::rc::Rc;

  use super::{escape_text, live_set_xml};
  use crate::config::Config;
  use crate::project::clip::{ClipData, WarpMode};
  use crate::project::tempo::Tempo;
  use crate::project::Project;

  fn clip_data(name: &str, bpm: f64, duration: f64) -> ClipData {
    ClipData {
      name: name.into(),
      audio: Rc::new(vec![1, 2, 3, 4]),
      bpm,
      loop_enabled: true,
      warp_mode: WarpMode::Beats,
      duration,
    }
  }

  fn one_clip_project() -> Project {
    let config = Config::from_str("[project]\ntracks = 1").unwrap();
    let mut project = Project::new(&config);
    project.set_tempo(Tempo::new(128));
    project.add_scene("Intro", "#FF0000");
    project.set_clip(0, 0, clip_data("kick.wav", 128.0, 2.0)).unwrap();
    project
  }

  #[test]
  pub fn escape_text_covers_all_metacharacters() {
    assert_eq!(
      escape_text(r#"a & b < c > d " e ' f"#),
      "a &amp; b &lt; c &gt; d &quot; e &apos; f"
    );
    assert_eq!(escape_text("plain"), "plain");
  }

  #[test]
  pub fn document_structure() {
    let mut project = one_clip_project();
    let xml = live_set_xml(&mut project, 7).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"Creator="Ableton Project Stager""#));
    assert!(xml.contains(r#"<OverwriteProtectionNumber Value="7" />"#));
    assert_eq!(xml.matches("<MainTrack>").count(), 1);
    assert_eq!(xml.matches("<PreHearTrack>").count(), 1);
    assert_eq!(xml.matches("<AudioTrack ").count(), 1);
    assert_eq!(xml.matches("<Scene ").count(), 1);
  }

  #[test]
  pub fn clip_entry_fields() {
    let mut project = one_clip_project();
    let xml = live_set_xml(&mut project, 7).unwrap();

    // 2.0s at 128 bpm, two-decimal precision
    assert!(xml.contains(r#"<CurrentEnd Value="4.27" />"#));
    assert!(xml.contains(r#"<LoopEnd Value="4.27" />"#));
    assert!(xml.contains(r#"<LoopOn Value="true" />"#));
    assert!(xml.contains(r#"<WarpMode Value="0" />"#));
    assert!(xml.contains(r#"<RelativePath Value="Samples/Imported/kick.wav" />"#));
    assert!(xml.contains(r#"SecTime="0.0" BeatTime="0.0""#));
    assert!(xml.contains(r#"SecTime="2.0" BeatTime="4.27""#));
  }

  #[test]
  pub fn tempo_is_formatted_with_a_decimal_point() {
    let mut project = one_clip_project();
    let xml = live_set_xml(&mut project, 7).unwrap();
    assert!(xml.contains(r#"<Tempo><Manual Value="128.0" /></Tempo>"#));
    assert!(xml.contains(r#"<Tempo Value="128.0" />"#));
  }

  #[test]
  pub fn next_pointee_id_counts_all_allocations() {
    // Model allocations: track 20000, scene 20001, clip 20002.
    // The builder then takes 20003 and 20004 for the two warp markers.
    let mut project = one_clip_project();
    let xml = live_set_xml(&mut project, 7).unwrap();
    assert!(xml.contains(r#"<NextPointeeId Value="20005" />"#));
    assert!(xml.contains(r#"<WarpMarker Id="20003" SecTime="0.0" BeatTime="0.0" />"#));
    assert!(xml.contains(r#"<WarpMarker Id="20004" SecTime="2.0" BeatTime="4.27" />"#));
  }

  #[test]
  pub fn empty_slots_are_emitted_per_scene() {
    let config = Config::from_str("[project]\ntracks = 2").unwrap();
    let mut project = Project::new(&config);
    project.add_default_scene();
    project.add_default_scene();
    project.set_clip(0, 0, clip_data("kick.wav", 120.0, 1.0)).unwrap();

    let xml = live_set_xml(&mut project, 7).unwrap();
    // 2 tracks x 2 scenes: one filled slot, three empty in the main
    // sequencers, plus 4 empty freeze slots.
    assert_eq!(xml.matches("<AudioClip ").count(), 1);
    assert_eq!(xml.matches("<ClipSlot Id=\"0\"><LomId").count() + xml.matches("<ClipSlot Id=\"1\"><LomId").count(), 7);
  }

  #[test]
  pub fn user_text_is_escaped() {
    let config = Config::from_str("[project]\ntracks = 1").unwrap();
    let mut project = Project::new(&config);
    project.track_mut(0).unwrap().set_name("Kick & <Sub>");
    project.add_scene(r#"A "loud" scene"#, "#00FF00");
    project.set_clip(0, 0, clip_data("it's <a> kick & \"snare\".wav", 120.0, 1.0)).unwrap();

    let xml = live_set_xml(&mut project, 7).unwrap();
    assert!(xml.contains("Kick &amp; &lt;Sub&gt;"));
    assert!(xml.contains("A &quot;loud&quot; scene"));
    assert!(xml.contains("it&apos;s &lt;a&gt; kick &amp; &quot;snare&quot;.wav"));
    assert!(!xml.contains("Kick & <Sub>"));
  }

  #[test]
  pub fn document_is_well_formed_with_metacharacter_names() {
    let config = Config::from_str("[project]\ntracks = 2").unwrap();
    let mut project = Project::new(&config);
    project.track_mut(0).unwrap().set_name("Kick & <Sub>");
    project.add_scene(r#"A "loud" scene"#, "#00FF00");
    project.add_default_scene();
    project.set_clip(0, 0, clip_data("it's <a> kick & \"snare\".wav", 120.0, 1.0)).unwrap();
    project.set_clip(1, 1, clip_data("kick.wav", 128.0, 2.0)).unwrap();

    let xml = live_set_xml(&mut project, 7).unwrap();
    let document = roxmltree::Document::parse(&xml).unwrap();
    assert_eq!(document.root_element().tag_name().name(), "Ableton");

    let clip_names: Vec<&str> = document
      .descendants()
      .filter(|node| node.has_tag_name("AudioClip"))
      .filter_map(|node| {
        node.children().find(|child| child.has_tag_name("Name"))
      })
      .filter_map(|name| name.attribute("Value"))
      .collect();
    assert_eq!(clip_names, vec!["it's <a> kick & \"snare\".wav", "kick.wav"]);
  }

  #[test]
  pub fn output_is_deterministic_for_a_fixed_project() {
    let mut first = one_clip_project();
    let mut second = one_clip_project();
    assert_eq!(
      live_set_xml(&mut first, 42).unwrap(),
      live_set_xml(&mut second, 42).unwrap()
    );
  }
}
