// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

mod cliques;
mod convert;

use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

#[pymodule]
#[pyo3(name = "CliqueEnumerator")]
pub fn clique_enumerator(_py: Python, m: &Bound<PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cliques::enumerate_cliques, m)?)?;
    m.add_function(wrap_pyfunction!(cliques::find_cliques, m)?)?;
    m.add_function(wrap_pyfunction!(cliques::find_cliques_from_edges, m)?)?;
    Ok(())
}
