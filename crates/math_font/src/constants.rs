//! OpenType MATH constants block
//!
//! Every constant the layout rules consume, in points at the font's base
//! size. A backend fills this from the font's MATH table when one exists;
//! `MathConstants::fallback` supplies em-proportional defaults so a font
//! without a MATH table still lays out.

use serde::{Deserialize, Serialize};

/// Layout constants of a math font, in points at the base size.
///
/// Percent-valued entries (`*_percent*`) are kept as percentages, matching
/// the MATH table encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathConstants {
    /// Height of the fraction/operator axis above the baseline
    pub axis_height: f32,
    /// Scale-down applied at script style, as a percentage
    pub script_percent_scale_down: f32,
    /// Scale-down applied at scriptscript style, as a percentage
    pub script_script_percent_scale_down: f32,

    // Fractions
    pub fraction_rule_thickness: f32,
    pub fraction_numerator_shift_up: f32,
    pub fraction_numerator_display_style_shift_up: f32,
    pub fraction_denominator_shift_down: f32,
    pub fraction_denominator_display_style_shift_down: f32,
    pub fraction_numerator_gap_min: f32,
    pub fraction_num_display_style_gap_min: f32,
    pub fraction_denominator_gap_min: f32,
    pub fraction_denom_display_style_gap_min: f32,

    // Radicals
    pub radical_rule_thickness: f32,
    pub radical_vertical_gap: f32,
    pub radical_display_style_vertical_gap: f32,
    pub radical_extra_ascender: f32,
    pub radical_kern_before_degree: f32,
    pub radical_kern_after_degree: f32,
    /// How far up the degree sits, as a percentage of the surd height
    pub radical_degree_bottom_raise_percent: f32,

    // Scripts
    pub superscript_shift_up: f32,
    pub superscript_shift_up_cramped: f32,
    pub superscript_bottom_min: f32,
    pub superscript_baseline_drop_max: f32,
    pub superscript_bottom_max_with_subscript: f32,
    pub sub_superscript_gap_min: f32,
    pub subscript_shift_down: f32,
    pub subscript_top_max: f32,
    pub subscript_baseline_drop_min: f32,
    /// Extra space before a pre-script and after a post-script
    pub space_after_script: f32,

    // Limits
    pub upper_limit_gap_min: f32,
    pub upper_limit_baseline_rise_min: f32,
    pub lower_limit_gap_min: f32,
    pub lower_limit_baseline_drop_min: f32,

    // Over/underbars
    pub overbar_rule_thickness: f32,
    pub overbar_vertical_gap: f32,
    pub overbar_extra_ascender: f32,
    pub underbar_rule_thickness: f32,
    pub underbar_vertical_gap: f32,
    pub underbar_extra_descender: f32,

    // Accents
    /// Ascent below which accents are lowered to hug the base
    pub accent_base_height: f32,
}

impl MathConstants {
    /// Em-proportional defaults for fonts without a MATH table.
    ///
    /// Values are tuning defaults, not a correctness contract; they are
    /// pinned by golden-metric regression tests in the layout crate.
    pub fn fallback(font_size: f32) -> Self {
        let em = font_size;
        Self {
            axis_height: em * 0.25,
            script_percent_scale_down: 70.0,
            script_script_percent_scale_down: 50.0,

            fraction_rule_thickness: em * 0.04,
            fraction_numerator_shift_up: em * 0.39,
            fraction_numerator_display_style_shift_up: em * 0.68,
            fraction_denominator_shift_down: em * 0.34,
            fraction_denominator_display_style_shift_down: em * 0.69,
            fraction_numerator_gap_min: em * 0.12,
            fraction_num_display_style_gap_min: em * 0.2,
            fraction_denominator_gap_min: em * 0.12,
            fraction_denom_display_style_gap_min: em * 0.2,

            radical_rule_thickness: em * 0.04,
            radical_vertical_gap: em * 0.1,
            radical_display_style_vertical_gap: em * 0.15,
            radical_extra_ascender: em * 0.04,
            radical_kern_before_degree: em * 0.28,
            radical_kern_after_degree: em * -0.55,
            radical_degree_bottom_raise_percent: 60.0,

            superscript_shift_up: em * 0.36,
            superscript_shift_up_cramped: em * 0.28,
            superscript_bottom_min: em * 0.13,
            superscript_baseline_drop_max: em * 0.39,
            superscript_bottom_max_with_subscript: em * 0.35,
            sub_superscript_gap_min: em * 0.16,
            subscript_shift_down: em * 0.21,
            subscript_top_max: em * 0.36,
            subscript_baseline_drop_min: em * 0.16,
            space_after_script: em * 0.04,

            upper_limit_gap_min: em * 0.11,
            upper_limit_baseline_rise_min: em * 0.3,
            lower_limit_gap_min: em * 0.17,
            lower_limit_baseline_drop_min: em * 0.6,

            overbar_rule_thickness: em * 0.04,
            overbar_vertical_gap: em * 0.12,
            overbar_extra_ascender: em * 0.04,
            underbar_rule_thickness: em * 0.04,
            underbar_vertical_gap: em * 0.12,
            underbar_extra_descender: em * 0.04,

            accent_base_height: em * 0.45,
        }
    }
}
