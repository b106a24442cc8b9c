use glam::{DQuat, DVec3};

use crate::panel::Panel;
use crate::types::{PanelId, Rgb, Sky};

/// Host-side display updates. The simulation never touches rendered objects directly;
/// it hands its latest values to a sink once per frame.
pub trait RenderSink {
    fn set_sky(&mut self, sky: &Sky);
    fn set_panel_transform(&mut self, id: PanelId, position: DVec3, orientation: DQuat);
    fn set_panel_material(&mut self, id: PanelId, color: Rgb, efficiency: f64);
}

pub fn present<'a, R, I>(sink: &mut R, sky: &Sky, panels: I)
where
    R: RenderSink + ?Sized,
    I: IntoIterator<Item = &'a Panel>,
{
    sink.set_sky(sky);
    for panel in panels {
        sink.set_panel_transform(panel.id, panel.position, panel.orientation);
        sink.set_panel_material(panel.id, panel.material_color(), panel.efficiency);
    }
}
