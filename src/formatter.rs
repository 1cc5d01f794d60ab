// ShipSim: Discrete-Event Package-Shipping Network Simulator
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Formats [`Path`] values the way a `connect`/`explore` query result line is rendered.
//!
//! This module only produces strings; it does not parse a query language or dispatch by name —
//! that belongs to a facade built on top of this crate. It exists so that facade has a ready-made
//! `Display` implementation to hand back verbatim.

use std::fmt;

use itertools::Itertools;

use crate::network::ShippingNetwork;
use crate::path::{Path, PathElement};
use crate::types::PathMode;

/// Trait to format a type that references entities by id, resolving names through the network.
pub trait NetworkFormatter<'a, 'n> {
    /// Type returned, implementing [`std::fmt::Display`].
    type Formatter;

    /// Produce the displayable form of `self` given the network it belongs to.
    fn fmt(&'a self, net: &'n ShippingNetwork) -> Self::Formatter;
}

/// Displayable rendering of one [`PathElement`]: `source(segment:length:returnSegment)`.
pub struct ElementDisplay {
    text: String,
}

impl fmt::Display for ElementDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl<'a, 'n> NetworkFormatter<'a, 'n> for PathElement {
    type Formatter = ElementDisplay;

    fn fmt(&'a self, net: &'n ShippingNetwork) -> Self::Formatter {
        let seg = net.segment(self.segment());
        let text = match seg {
            Some(seg) => {
                let source = seg.source().and_then(|l| net.location(l)).map(|l| l.name()).unwrap_or("?");
                let ret = seg
                    .return_segment()
                    .and_then(|r| net.segment(r))
                    .map(|r| r.name())
                    .unwrap_or("?");
                format!("{}({}:{:.2}:{})", source, seg.name(), seg.length().value(), ret)
            }
            None => "?".to_string(),
        };
        ElementDisplay { text }
    }
}

/// Displayable rendering of a whole [`Path`] for a `connect` query:
/// `<cost> <time> <yes|no>; <hop> ... <hop> <lastLocation>`.
pub struct ConnectDisplay {
    text: String,
}

impl fmt::Display for ConnectDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Displayable rendering of a whole [`Path`] for an `explore` query:
/// `<hop> ... <hop> <lastLocation>`.
pub struct ExploreDisplay {
    text: String,
}

impl fmt::Display for ExploreDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn hops(path: &Path, net: &ShippingNetwork) -> String {
    path.elements().iter().map(|e| e.fmt(net).to_string()).join(" ")
}

/// Formats `path` as a `connect` query result line.
pub fn format_connect(path: &Path, net: &ShippingNetwork) -> ConnectDisplay {
    let expedited = path.elements().iter().any(|e| e.mode() == PathMode::Expedited);
    let last = path
        .last_location(net)
        .and_then(|l| net.location(l))
        .map(|l| l.name())
        .unwrap_or("?");
    let text = format!(
        "{:.2} {:.2} {}; {} {}",
        path.cost().value(),
        path.time().value(),
        if expedited { "yes" } else { "no" },
        hops(path, net),
        last,
    );
    ConnectDisplay { text }
}

/// Formats `path` as an `explore` query result line.
pub fn format_explore(path: &Path, net: &ShippingNetwork) -> ExploreDisplay {
    let last = path
        .last_location(net)
        .and_then(|l| net.location(l))
        .map(|l| l.name())
        .unwrap_or("?");
    let text = format!("{} {}", hops(path, net), last);
    ExploreDisplay { text }
}

/// Formats a full query result set: expedited paths precede unexpedited, and duplicate lines are
/// removed (the two query line-formats above are already unique per distinct path, so dedup here
/// only matters if the same path is pushed into the set twice).
pub fn format_query_result(
    paths: &[Path],
    net: &ShippingNetwork,
    connect: bool,
) -> Vec<String> {
    let mut expedited = Vec::new();
    let mut unexpedited = Vec::new();
    for path in paths {
        let line = if connect {
            format_connect(path, net).to_string()
        } else {
            format_explore(path, net).to_string()
        };
        let has_expedited = path.elements().iter().any(|e| e.mode() == PathMode::Expedited);
        if has_expedited {
            expedited.push(line);
        } else {
            unexpedited.push(line);
        }
    }
    expedited.extend(unexpedited);
    expedited.into_iter().unique().collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{LocationKind, Mile, TransportMode};

    fn line(net: &mut ShippingNetwork) -> crate::types::SegmentId {
        let a = net.location_new("A", LocationKind::Port);
        let b = net.location_new("B", LocationKind::Port);
        let fwd = net.segment_new("s1", TransportMode::Truck);
        let back = net.segment_new("s2", TransportMode::Truck);
        net.set_source(fwd, Some(a)).unwrap();
        net.set_source(back, Some(b)).unwrap();
        net.set_return_segment(fwd, Some(back)).unwrap();
        net.set_length(fwd, Mile::new(5.0).unwrap()).unwrap();
        net.set_length(back, Mile::new(5.0).unwrap()).unwrap();
        fwd
    }

    #[test]
    fn explore_format_matches_table() {
        let mut net = ShippingNetwork::new();
        let fwd = line(&mut net);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        let text = format_explore(&path, &net).to_string();
        assert_eq!(text, "A(s1:5.00:s2) B");
    }

    #[test]
    fn connect_format_includes_cost_time_expedited_flag() {
        let mut net = ShippingNetwork::new();
        let fwd = line(&mut net);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        let text = format_connect(&path, &net).to_string();
        assert_eq!(text, "5.00 5.00 no; A(s1:5.00:s2) B");
    }

    #[test]
    fn query_result_orders_expedited_first_and_dedups() {
        let mut net = ShippingNetwork::new();
        let fwd = line(&mut net);
        let path = Path::seed(&net, fwd, PathMode::Unexpedited).unwrap();
        let result = format_query_result(&[path.clone(), path], &net, false);
        assert_eq!(result.len(), 1);
    }
}
