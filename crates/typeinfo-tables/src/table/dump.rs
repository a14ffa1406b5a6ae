//! Human-readable dumps of type tables and descriptors.

use typeinfo_core::Colors;

use super::binding::TypeBoundProcedure;
use super::component::Component;
use super::derived::{DerivedType, TypeFlags};
use super::descriptor::Descriptor;

/// Dump a type table: parameters, components, and procedures in table order.
pub fn dump_type(ty: &DerivedType<'_>, colors: Colors) -> String {
    let c = colors;
    let mut out = String::new();

    line(
        &mut out,
        format!(
            "type {} ({} bytes)",
            c.name(ty.name()),
            c.value(ty.size_in_bytes())
        ),
    );
    if let Some(base) = ty.base_type() {
        line(&mut out, format!("  extends {}", c.name(base.name())));
    }
    if !ty.flags().is_empty() {
        line(&mut out, format!("  flags {}", c.note(&type_flags(ty.flags()))));
    }
    if let Some(image) = ty.initializer() {
        line(
            &mut out,
            format!("  default image ({} bytes)", c.value(image.len())),
        );
    }
    for param in ty.parameters() {
        match param.len_index() {
            None => line(
                &mut out,
                format!("  kind {} = {}", param.name, c.value(param.value)),
            ),
            Some(which) => line(
                &mut out,
                format!(
                    "  len {} = {} (slot {which})",
                    param.name,
                    c.value(param.value)
                ),
            ),
        }
    }
    for component in ty.components() {
        line(&mut out, format!("  component {}", component_line(component, c)));
    }
    for tbp in ty.procedures() {
        line(
            &mut out,
            format!("  procedure {}: {}", tbp.name, c.note(&procedure_roles(tbp))),
        );
    }
    out
}

/// Dump a descriptor's shape and addendum.
///
/// KIND and LEN values of the addendum's type are listed by name.
pub fn dump_descriptor(desc: &Descriptor<'_>, colors: Colors) -> String {
    let c = colors;
    let mut out = String::new();

    line(
        &mut out,
        format!(
            "descriptor rank {}, elem_len {}, type {}, attribute {}",
            c.value(desc.rank),
            c.value(desc.elem_len),
            desc.type_code,
            desc.attribute.name()
        ),
    );
    let base = if desc.is_allocated() { "set" } else { "null" };
    line(&mut out, format!("  base_addr {base}"));
    if desc.is_finalization_suppressed() {
        line(&mut out, format!("  {}", c.note("do not finalize")));
    }
    for (j, dim) in desc.dimensions().iter().enumerate() {
        line(
            &mut out,
            format!(
                "  dim[{j}] lower_bound {}, extent {}, byte_stride {}",
                c.value(dim.lower_bound),
                c.value(dim.extent),
                c.value(dim.byte_stride)
            ),
        );
    }
    if desc.addendum().is_none() {
        return out;
    }
    let Some(ty) = desc.derived_type() else {
        line(&mut out, "  addendum without type".to_owned());
        return out;
    };
    line(&mut out, format!("  derived type {}", c.name(ty.name())));
    for param in ty.parameters() {
        let kind = if param.is_kind() { "kind" } else { "len" };
        line(
            &mut out,
            format!(
                "    {kind} {} = {}",
                param.name,
                c.value(param.get_value(desc))
            ),
        );
    }
    out
}

fn line(out: &mut String, text: String) {
    out.push_str(&text);
    out.push('\n');
}

fn type_flags(flags: TypeFlags) -> String {
    let names = [
        (TypeFlags::SEQUENCE, "sequence"),
        (TypeFlags::BIND_C, "bind(c)"),
        (TypeFlags::FINALIZABLE, "finalizable"),
        (TypeFlags::INIT_ZERO, "init-zero"),
        (TypeFlags::INIT_COMPONENT, "init-component"),
    ];
    names
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn component_line(component: &Component<'_>, c: Colors) -> String {
    let mut text = format!("{}: ", component.name);
    match component.nested_type() {
        Some(nested) => text.push_str(&format!("TYPE({})", c.name(nested.name()))),
        None => text.push_str(&component.type_code.to_string()),
    }
    if let Some(desc) = component.static_descriptor()
        && desc.rank() > 0
    {
        let extents: Vec<String> = desc
            .dimensions()
            .iter()
            .map(|d| d.extent.to_string())
            .collect();
        text.push_str(&format!(", dimension({})", extents.join(",")));
    }
    text.push_str(&format!(" @ {}", c.value(component.offset)));

    let mut notes = Vec::new();
    if component.is_parent() {
        notes.push("parent");
    }
    if component.is_private() {
        notes.push("private");
    }
    if component.is_descriptor() {
        notes.push("descriptor");
    }
    if !notes.is_empty() {
        text.push_str(&format!(" {}", c.note(&format!("[{}]", notes.join(", ")))));
    }
    text
}

fn procedure_roles(tbp: &TypeBoundProcedure<'_>) -> String {
    let mut roles = Vec::new();
    if tbp.is_initializer() {
        roles.push("initializer".to_owned());
    }
    if tbp.is_assignment() {
        roles.push("assignment".to_owned());
    }
    if tbp.is_assumed_rank_final() {
        roles.push("final(*)".to_owned());
    } else if tbp.final_rank != 0 {
        let ranks: Vec<String> = (0..u32::BITS)
            .filter(|&r| tbp.is_final_for_rank(r))
            .map(|r| r.to_string())
            .collect();
        roles.push(format!("final({})", ranks.join(",")));
    }
    if tbp.is_elemental() {
        roles.push("elemental".to_owned());
    }
    if roles.is_empty() {
        roles.push("binding".to_owned());
    }
    roles.join(", ")
}

impl DerivedType<'_> {
    /// Shorthand for [`dump_type`].
    pub fn dump(&self, colors: Colors) -> String {
        dump_type(self, colors)
    }
}
