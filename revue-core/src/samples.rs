//! Bundled sample files offered on the Samples tab.
//!
//! Loading a sample goes through [`FileIntake::from_bytes`](crate::intake::FileIntake::from_bytes)
//! so it obeys the same size and encoding rules as a file from disk.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFile {
    pub name: &'static str,
    pub description: &'static str,
    pub content: &'static str,
}

pub const SAMPLES: &[SampleFile] = &[
    SampleFile {
        name: "react-component.jsx",
        description: "React functional component with hooks",
        content: r#"import React, { useEffect, useState } from 'react';

export function UserList({ fetchUsers }) {
  let [users, setUsers] = useState([]);
  const [error, setError] = useState(null);

  useEffect(() => {
    fetchUsers()
      .then(setUsers)
      .catch(setError);
  }, [fetchUsers]);

  if (error) {
    return <p className="error">{error.message}</p>;
  }

  return (
    <ul>
      {users.map((user) => (
        <li key={user.id}>{user.profile.name}</li>
      ))}
    </ul>
  );
}
"#,
    },
    SampleFile {
        name: "api-service.js",
        description: "RESTful API service implementation",
        content: r#"const BASE_URL = '/api/v1';

async function request(path, options = {}) {
  const response = await fetch(`${BASE_URL}${path}`, {
    headers: { 'Content-Type': 'application/json' },
    ...options,
  });
  if (!response.ok) {
    throw new Error(`Request failed: ${response.status}`);
  }
  return response.json();
}

export const api = {
  list: (resource) => request(`/${resource}`),
  get: (resource, id) => request(`/${resource}/${id}`),
  create: (resource, body) =>
    request(`/${resource}`, { method: 'POST', body: JSON.stringify(body) }),
  remove: (resource, id) => request(`/${resource}/${id}`, { method: 'DELETE' }),
};
"#,
    },
    SampleFile {
        name: "data-processor.py",
        description: "Python data processing script",
        content: r#"import csv
from collections import defaultdict


def load_rows(path):
    with open(path, newline="") as handle:
        return list(csv.DictReader(handle))


def totals_by_region(rows):
    totals = defaultdict(float)
    for row in rows:
        totals[row["region"]] += float(row["amount"])
    return dict(totals)


if __name__ == "__main__":
    import sys

    for region, total in sorted(totals_by_region(load_rows(sys.argv[1])).items()):
        print(f"{region:<12} {total:>10.2f}")
"#,
    },
    SampleFile {
        name: "algorithm.java",
        description: "Java sorting algorithm implementation",
        content: r#"public final class MergeSort {
    private MergeSort() {}

    public static void sort(int[] values) {
        if (values.length < 2) {
            return;
        }
        int mid = values.length / 2;
        int[] left = java.util.Arrays.copyOfRange(values, 0, mid);
        int[] right = java.util.Arrays.copyOfRange(values, mid, values.length);
        sort(left);
        sort(right);
        merge(values, left, right);
    }

    private static void merge(int[] out, int[] left, int[] right) {
        int i = 0, j = 0, k = 0;
        while (i < left.length && j < right.length) {
            out[k++] = left[i] <= right[j] ? left[i++] : right[j++];
        }
        while (i < left.length) out[k++] = left[i++];
        while (j < right.length) out[k++] = right[j++];
    }
}
"#,
    },
];
